//! Create-vs-update decision policy for batch synchronization.

/// Per-key action chosen during a batch sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Create,
    Update,
    Skip,
}

/// Decide what to do with one desired key given the remote state and the
/// overwrite policy.
///
/// Absent keys are always created. Present keys are left untouched unless
/// `force_update` is set, in which case they are updated. No other
/// transitions exist.
pub fn plan_action(exists_remotely: bool, force_update: bool) -> SyncAction {
    match (exists_remotely, force_update) {
        (false, _) => SyncAction::Create,
        (true, false) => SyncAction::Skip,
        (true, true) => SyncAction::Update,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_are_created() {
        assert_eq!(plan_action(false, false), SyncAction::Create);
        assert_eq!(plan_action(false, true), SyncAction::Create);
    }

    #[test]
    fn present_keys_are_skipped_unless_forced() {
        assert_eq!(plan_action(true, false), SyncAction::Skip);
    }

    #[test]
    fn present_keys_are_updated_when_forced() {
        assert_eq!(plan_action(true, true), SyncAction::Update);
    }
}
