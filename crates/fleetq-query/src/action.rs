//! Status flags derived from action records.
//!
//! The backend reports an action through a coarse `status` (finished or
//! pending) and a `detailStatus`. The list views need a single state per row,
//! so the flags below collapse the two.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! lenient_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $($word:literal)|+),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            #[default]
            Unknown,
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => lenient_enum!(@first $($word)|+),)+
                    Self::Unknown => "unknown",
                }
            }
        }

        impl From<&str> for $name {
            fn from(word: &str) -> Self {
                let word = word.trim().to_ascii_lowercase();
                match word.as_str() {
                    $($($word)|+ => Self::$variant,)+
                    _ => Self::Unknown,
                }
            }
        }

        impl From<String> for $name {
            fn from(word: String) -> Self {
                Self::from(word.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
    (@first $first:literal $(| $rest:literal)*) => {
        $first
    };
}

lenient_enum! {
    /// Coarse action status.
    pub enum ActionStatus {
        Finished => "finished",
        Pending => "pending"
    }
}

lenient_enum! {
    /// Fine grained action status.
    pub enum DetailStatus {
        Finished => "finished",
        Error => "error",
        Warning => "warning",
        Running => "running",
        Canceled => "canceled" | "cancelled",
        Canceling => "canceling" | "cancelling",
        Retrieved => "retrieved",
        Download => "download",
        Downloaded => "downloaded",
        Scheduled => "scheduled",
        CancelRejected => "cancel_rejected" | "cancel-rejected",
        WaitForConfirmation => "wait_for_confirmation" | "wait-for-confirmation"
    }
}

lenient_enum! {
    pub enum ActionType {
        Update => "update",
        Cancel => "cancel"
    }
}

lenient_enum! {
    pub enum ForceType {
        Forced => "forced",
        Soft => "soft",
        TimeForced => "timeforced",
        DownloadOnly => "downloadonly"
    }
}

/// The fields of an action record the dashboard derives state from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Action {
    pub id: Option<u64>,
    pub status: ActionStatus,
    pub detail_status: DetailStatus,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub force_type: ForceType,
    pub rollout: Option<u64>,
    pub rollout_name: Option<String>,
}

/// One state per action, as shown in list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionState {
    Errored,
    Canceled,
    Canceling,
    WaitingForConfirmation,
    Finished,
    Scheduled,
    Running,
    Unknown,
}

impl ActionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Errored => "errored",
            Self::Canceled => "canceled",
            Self::Canceling => "canceling",
            Self::WaitingForConfirmation => "waiting-for-confirmation",
            Self::Finished => "finished",
            Self::Scheduled => "scheduled",
            Self::Running => "running",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub fn is_errored(&self) -> bool {
        self.detail_status == DetailStatus::Error
    }

    pub fn is_canceled(&self) -> bool {
        self.detail_status == DetailStatus::Canceled
    }

    /// A cancel request the device has not confirmed yet.
    pub fn is_canceling(&self) -> bool {
        self.detail_status == DetailStatus::Canceling
            || (self.action_type == ActionType::Cancel && self.is_active())
    }

    pub fn is_active(&self) -> bool {
        self.status == ActionStatus::Pending
    }

    pub fn is_finished(&self) -> bool {
        self.status == ActionStatus::Finished && !self.is_errored() && !self.is_canceled()
    }

    /// A pending action the device has started working on.
    pub fn is_running(&self) -> bool {
        self.is_active()
            && matches!(
                self.detail_status,
                DetailStatus::Running
                    | DetailStatus::Retrieved
                    | DetailStatus::Download
                    | DetailStatus::Downloaded
                    | DetailStatus::Warning
            )
    }

    pub fn is_waiting_for_confirmation(&self) -> bool {
        self.detail_status == DetailStatus::WaitForConfirmation
    }

    pub fn is_forced(&self) -> bool {
        matches!(self.force_type, ForceType::Forced | ForceType::TimeForced)
    }

    pub fn state(&self) -> ActionState {
        if self.is_errored() {
            ActionState::Errored
        } else if self.is_canceled() {
            ActionState::Canceled
        } else if self.is_canceling() {
            ActionState::Canceling
        } else if self.is_waiting_for_confirmation() {
            ActionState::WaitingForConfirmation
        } else if self.is_finished() {
            ActionState::Finished
        } else if self.is_running() {
            ActionState::Running
        } else if self.is_active() {
            ActionState::Scheduled
        } else {
            ActionState::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(status: &str, detail: &str) -> Action {
        Action {
            status: status.into(),
            detail_status: detail.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_errored_and_canceled() {
        assert!(action("finished", "error").is_errored());
        assert!(action("finished", "canceled").is_canceled());
        assert!(!action("finished", "finished").is_errored());
    }

    #[test]
    fn test_parsing_is_case_insensitive() {
        assert_eq!(DetailStatus::from("ERROR"), DetailStatus::Error);
        assert_eq!(DetailStatus::from("Wait_For_Confirmation"), DetailStatus::WaitForConfirmation);
        assert_eq!(DetailStatus::from("cancelled"), DetailStatus::Canceled);
        assert_eq!(DetailStatus::from("exploded"), DetailStatus::Unknown);
    }

    #[test]
    fn test_cancel_type_pending_is_canceling() {
        let mut cancel = action("pending", "running");
        cancel.action_type = ActionType::Cancel;
        assert!(cancel.is_canceling());
        assert_eq!(cancel.state(), ActionState::Canceling);
    }

    #[test]
    fn test_state_precedence() {
        assert_eq!(action("finished", "error").state(), ActionState::Errored);
        assert_eq!(action("finished", "canceled").state(), ActionState::Canceled);
        assert_eq!(action("pending", "canceling").state(), ActionState::Canceling);
        assert_eq!(
            action("pending", "wait_for_confirmation").state(),
            ActionState::WaitingForConfirmation
        );
        assert_eq!(action("finished", "finished").state(), ActionState::Finished);
        assert_eq!(action("pending", "scheduled").state(), ActionState::Scheduled);
        assert_eq!(action("pending", "retrieved").state(), ActionState::Running);
        assert_eq!(action("", "").state(), ActionState::Unknown);
    }

    #[test]
    fn test_finished_detail_on_pending_action_is_not_finished() {
        let pending = action("pending", "finished");
        assert!(!pending.is_finished());
        assert_eq!(pending.state(), ActionState::Scheduled);

        assert!(action("finished", "").is_finished());
        assert!(!action("finished", "error").is_finished());
    }

    #[test]
    fn test_running_is_checked_before_scheduled() {
        assert_eq!(action("pending", "running").state(), ActionState::Running);
        assert_eq!(action("pending", "downloaded").state(), ActionState::Running);
        assert_eq!(action("pending", "scheduled").state(), ActionState::Scheduled);
        assert_eq!(action("pending", "").state(), ActionState::Scheduled);
        assert!(!action("finished", "running").is_running());
    }

    #[test]
    fn test_forced() {
        let mut a = Action::default();
        a.force_type = ForceType::TimeForced;
        assert!(a.is_forced());
        a.force_type = ForceType::Soft;
        assert!(!a.is_forced());
    }

    #[test]
    fn test_deserialize_action_json() {
        let action: Action = serde_json::from_str(
            r#"{
                "id": 42,
                "status": "pending",
                "detailStatus": "download",
                "type": "update",
                "forceType": "forced",
                "rollout": 7,
                "rolloutName": "wave-1",
                "weight": 500
            }"#,
        )
        .unwrap();

        assert_eq!(action.id, Some(42));
        assert_eq!(action.detail_status, DetailStatus::Download);
        assert_eq!(action.rollout_name.as_deref(), Some("wave-1"));
        assert!(action.is_forced());
        assert_eq!(action.state(), ActionState::Running);
    }

    #[test]
    fn test_deserialize_sparse_action() {
        let action: Action = serde_json::from_str(r#"{"detailStatus": "error"}"#).unwrap();
        assert_eq!(action.status, ActionStatus::Unknown);
        assert_eq!(action.state(), ActionState::Errored);
    }
}
