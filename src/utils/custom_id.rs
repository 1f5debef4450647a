//! Encoding of the pull prompt buttons (Discord-agnostic apart from the id types)
use std::{fmt, str::FromStr};

use poise::serenity_prelude::UserId;

use crate::constants::{ACCEPT_PULL_ID, CUSTOM_ID_SEPARATOR, DECLINE_PULL_ID};

/// Which button of a pull prompt was pressed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullAction {
    Accept,
    Decline,
}

impl PullAction {
    fn tag(self) -> &'static str {
        match self {
            PullAction::Accept => ACCEPT_PULL_ID,
            PullAction::Decline => DECLINE_PULL_ID,
        }
    }

    /// Verb used in user-facing messages
    pub fn verb(self) -> &'static str {
        match self {
            PullAction::Accept => "accept",
            PullAction::Decline => "decline",
        }
    }
}

/// Data carried by a pull prompt button: `<action>:<requester>:<target>`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PullPayload {
    pub action: PullAction,
    pub requester: UserId,
    pub target: UserId,
}

/// Why a component custom id was rejected
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The component does not belong to a pull prompt
    #[error("not a pull prompt component")]
    UnknownAction,
    /// Looks like a pull prompt component but cannot be trusted
    #[error("malformed pull prompt payload")]
    Malformed,
}

impl PullPayload {
    pub fn new(action: PullAction, requester: UserId, target: UserId) -> Self {
        Self {
            action,
            requester,
            target,
        }
    }

    /// Both buttons of the prompt for this request, accept first
    pub fn buttons(requester: UserId, target: UserId) -> [Self; 2] {
        [
            Self::new(PullAction::Accept, requester, target),
            Self::new(PullAction::Decline, requester, target),
        ]
    }
}

impl fmt::Display for PullPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.action.tag(),
            self.requester.get(),
            self.target.get(),
            sep = CUSTOM_ID_SEPARATOR
        )
    }
}

fn parse_user_id(part: Option<&str>) -> Result<UserId, PayloadError> {
    part.and_then(|raw| raw.parse::<u64>().ok())
        .filter(|&id| id != 0)
        .map(UserId::new)
        .ok_or(PayloadError::Malformed)
}

impl FromStr for PullPayload {
    type Err = PayloadError;

    fn from_str(custom_id: &str) -> Result<Self, Self::Err> {
        let mut parts = custom_id.split(CUSTOM_ID_SEPARATOR);

        let action = match parts.next() {
            Some(ACCEPT_PULL_ID) => PullAction::Accept,
            Some(DECLINE_PULL_ID) => PullAction::Decline,
            _ => return Err(PayloadError::UnknownAction),
        };

        let requester = parse_user_id(parts.next())?;
        let target = parse_user_id(parts.next())?;

        if parts.next().is_some() || requester == target {
            return Err(PayloadError::Malformed);
        }

        Ok(Self::new(action, requester, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_id_format() {
        let payload = PullPayload::new(PullAction::Accept, UserId::new(11), UserId::new(22));
        assert_eq!(payload.to_string(), "accept-pull:11:22");

        let payload = PullPayload::new(PullAction::Decline, UserId::new(11), UserId::new(22));
        assert_eq!(payload.to_string(), "decline-pull:11:22");
    }

    #[test]
    fn test_parse_valid_payload() {
        let payload: PullPayload = "decline-pull:123:456".parse().unwrap();
        assert_eq!(payload.action, PullAction::Decline);
        assert_eq!(payload.requester, UserId::new(123));
        assert_eq!(payload.target, UserId::new(456));
    }

    #[test]
    fn test_buttons_parse_back() {
        let [accept, decline] = PullPayload::buttons(UserId::new(5), UserId::new(6));
        assert_eq!(accept.to_string().parse::<PullPayload>(), Ok(accept));
        assert_eq!(decline.to_string().parse::<PullPayload>(), Ok(decline));
    }

    #[test]
    fn test_foreign_components_are_unknown() {
        assert_eq!(
            "configure_channel".parse::<PullPayload>(),
            Err(PayloadError::UnknownAction)
        );
        assert_eq!("".parse::<PullPayload>(), Err(PayloadError::UnknownAction));
        // Underscore form is not accepted
        assert_eq!(
            "accept_pull_1_2".parse::<PullPayload>(),
            Err(PayloadError::UnknownAction)
        );
    }

    #[test]
    fn test_malformed_payloads_fail_closed() {
        for custom_id in [
            "accept-pull",
            "accept-pull:",
            "accept-pull:1",
            "accept-pull:1:",
            "accept-pull:abc:2",
            "accept-pull:1:-2",
            "accept-pull:0:2",
            "accept-pull:1:2:3",
            "accept-pull:7:7",
            "accept-pull: 1:2",
        ] {
            assert_eq!(
                custom_id.parse::<PullPayload>(),
                Err(PayloadError::Malformed),
                "{custom_id} should be rejected"
            );
        }
    }
}
