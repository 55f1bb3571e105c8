//! Property tests for conversation submission semantics.

use folio_chat::conversation::{Conversation, Role, Submission};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// While a question is in flight, every further submission is rejected
    /// and leaves the log untouched.
    #[test]
    fn submissions_while_pending_are_no_ops(
        first in "[a-zA-Z ?]{1,40}",
        later in proptest::collection::vec("[a-zA-Z ?]{0,40}", 0..10),
    ) {
        prop_assume!(!first.trim().is_empty());
        let mut conversation = Conversation::new();
        prop_assert_eq!(conversation.submit(&first), Submission::Accepted);
        let turns_before = conversation.turns().to_vec();

        for question in &later {
            let outcome = conversation.submit(question);
            prop_assert!(
                matches!(outcome, Submission::RejectedPending | Submission::RejectedEmpty),
                "submission accepted while pending: {outcome:?}",
            );
            prop_assert_eq!(conversation.turns(), turns_before.as_slice());
            prop_assert!(conversation.is_pending());
        }
    }

    /// Blank input never changes state.
    #[test]
    fn blank_submissions_never_change_state(
        blanks in proptest::collection::vec("[ \t\n]{0,10}", 1..10),
    ) {
        let mut conversation = Conversation::new();
        for blank in &blanks {
            prop_assert_eq!(conversation.submit(blank), Submission::RejectedEmpty);
            prop_assert!(!conversation.is_pending());
            prop_assert!(conversation.turns().is_empty());
        }
    }

    /// An accepted submission appends exactly one trimmed user turn.
    #[test]
    fn accepted_submission_appends_one_user_turn(question in "[a-zA-Z0-9 ?!.]{1,60}") {
        prop_assume!(!question.trim().is_empty());
        let mut conversation = Conversation::new();
        prop_assert_eq!(conversation.submit(&question), Submission::Accepted);
        prop_assert_eq!(conversation.turns().len(), 1);
        prop_assert_eq!(conversation.turns()[0].role, Role::User);
        prop_assert_eq!(conversation.turns()[0].content.as_str(), question.trim());
    }
}
