//! Route guard decision.
//!
//! The guard never redirects while the session is still loading; it only
//! picks between rendering and redirecting once `loading` is false.

use super::session::Session;
use super::store::User;

/// Where unauthenticated loads are sent.
pub const UNAUTHENTICATED_ENTRY: &str = "/auth";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Still resolving: show a loading indicator, decide nothing.
    Pending,
    Render(User),
    Redirect(&'static str),
}

#[must_use]
pub fn decide(session: &Session) -> GuardDecision {
    if session.loading {
        return GuardDecision::Pending;
    }
    match &session.user {
        Some(user) => GuardDecision::Render(user.clone()),
        None => GuardDecision::Redirect(UNAUTHENTICATED_ENTRY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::test_helpers::ana;

    #[test]
    fn loading_is_pending_even_with_a_user() {
        let session = Session { user: Some(ana()), loading: true };
        assert_eq!(decide(&session), GuardDecision::Pending);
        assert_eq!(decide(&Session::initial()), GuardDecision::Pending);
    }

    #[test]
    fn settled_with_user_renders() {
        assert_eq!(decide(&Session::settled(Some(ana()))), GuardDecision::Render(ana()));
    }

    #[test]
    fn settled_without_user_redirects() {
        assert_eq!(decide(&Session::settled(None)), GuardDecision::Redirect("/auth"));
    }

    #[test]
    fn never_renders_while_loading_for_any_update_sequence() {
        // decide() is stateless, so every state in every order covers every sequence.
        let states = [
            Session::initial(),
            Session { user: Some(ana()), loading: true },
            Session::settled(None),
            Session::settled(Some(ana())),
        ];
        for first in &states {
            for second in &states {
                for s in [first, second] {
                    let decision = decide(s);
                    assert_eq!(s.loading, decision == GuardDecision::Pending, "state {s:?}");
                }
            }
        }
    }
}
