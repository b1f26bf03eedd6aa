//! The resign / draw / rematch negotiation state machine.
//!
//! Each peer runs its own copy; the two stay in step only through the
//! [`GameAction`] messages the server relays. There is no shared state.
//!
//! ```text
//!                 press Draw                     recv DrawAccept/Reject
//!   Idle ────────────────────→ AwaitingPeer(Draw) ──────────────────────→ Idle
//!    │  press Resign                                recv DrawOffer
//!    ├────────────→ LocalPrompt ─────────Yes/No→ Idle   (any live state) ─→ PeerOffered(Draw)
//!    │  recv Win/Lose/DrawResult (from any state)
//!    └────────────→ ResultShown ──press New game──→ AwaitingPeer(Rematch)
//! ```
//!
//! Resigning is the one asymmetric flow: the first click only asks for
//! confirmation, and only the confirmation goes on the wire.

use std::fmt;

use gambit_protocol::{ActionKind, GameAction};

/// What an open offer is for. Resigning never goes through an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offer {
    Draw,
    Rematch,
}

/// The negotiation state, including the single pending-offer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegotiationState {
    /// Game in progress, nothing pending.
    #[default]
    Idle,
    /// The local UI is asking to confirm a resignation; nothing sent yet.
    LocalPrompt,
    /// We made an offer and wait for the peer's answer.
    AwaitingPeer(Offer),
    /// The peer made an offer; the local UI shows accept/reject.
    PeerOffered(Offer),
    /// The game is over. Left only through a rematch or disconnect.
    ResultShown,
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::LocalPrompt => write!(f, "LocalPrompt"),
            Self::AwaitingPeer(c) => write!(f, "AwaitingPeer({c:?})"),
            Self::PeerOffered(c) => write!(f, "PeerOffered({c:?})"),
            Self::ResultShown => write!(f, "ResultShown"),
        }
    }
}

/// The two option buttons next to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionButton {
    Primary,
    Secondary,
}

/// Something the caller has to do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Enqueue `GameAction { action, detail: "" }`.
    Send(ActionKind),
    /// Replace the status line.
    Status(String),
    /// Tear the connection down. No message is sent.
    Disconnect,
}

/// Drives one peer's side of every negotiation.
#[derive(Debug, Clone, Default)]
pub struct Negotiation {
    state: NegotiationState,
}

impl Negotiation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Current `(primary, secondary)` button actions.
    pub fn buttons(&self) -> (ActionKind, ActionKind) {
        use NegotiationState::*;
        use Offer::*;

        match self.state {
            Idle | AwaitingPeer(Draw) => {
                (ActionKind::DrawPrompt, ActionKind::ResignPrompt)
            }
            LocalPrompt => {
                (ActionKind::ResignConfirm, ActionKind::ResignCancel)
            }
            PeerOffered(Draw) => {
                (ActionKind::DrawAccept, ActionKind::DrawReject)
            }
            PeerOffered(Rematch) => {
                (ActionKind::RematchAccept, ActionKind::RematchReject)
            }
            ResultShown | AwaitingPeer(Rematch) => {
                (ActionKind::RematchPrompt, ActionKind::Exit)
            }
        }
    }

    /// Handles a click on one of the option buttons.
    pub fn press(&mut self, button: OptionButton) -> Vec<Effect> {
        use NegotiationState::*;
        use Offer::*;

        let (primary, secondary) = self.buttons();
        let kind = match button {
            OptionButton::Primary => primary,
            OptionButton::Secondary => secondary,
        };

        let (next, effects) = match (self.state, kind) {
            (Idle, ActionKind::DrawPrompt) => (
                AwaitingPeer(Draw),
                vec![
                    Effect::Send(ActionKind::DrawOffer),
                    status("Draw offer sent!"),
                ],
            ),
            (AwaitingPeer(Draw), ActionKind::DrawPrompt) => {
                (self.state, vec![status("Draw offer already sent")])
            }
            (Idle | AwaitingPeer(Draw), ActionKind::ResignPrompt) => {
                (LocalPrompt, vec![])
            }
            (LocalPrompt, ActionKind::ResignConfirm) => {
                (Idle, vec![Effect::Send(ActionKind::ResignConfirm)])
            }
            (LocalPrompt, ActionKind::ResignCancel) => (Idle, vec![]),
            (PeerOffered(Draw), ActionKind::DrawAccept) => {
                (Idle, vec![Effect::Send(ActionKind::DrawAccept)])
            }
            (PeerOffered(Draw), ActionKind::DrawReject) => {
                (Idle, vec![Effect::Send(ActionKind::DrawReject)])
            }
            (ResultShown, ActionKind::RematchPrompt) => (
                AwaitingPeer(Rematch),
                vec![
                    Effect::Send(ActionKind::RematchOffer),
                    status("Invitation sent!"),
                ],
            ),
            (AwaitingPeer(Rematch), ActionKind::RematchPrompt) => {
                (self.state, vec![status("Invitation already sent")])
            }
            (ResultShown | AwaitingPeer(Rematch), ActionKind::Exit) => {
                (self.state, vec![Effect::Disconnect])
            }
            (PeerOffered(Rematch), ActionKind::RematchAccept) => {
                (Idle, vec![Effect::Send(ActionKind::RematchAccept)])
            }
            (PeerOffered(Rematch), ActionKind::RematchReject) => {
                (ResultShown, vec![Effect::Send(ActionKind::RematchReject)])
            }
            (state, kind) => {
                tracing::debug!(%state, ?kind, "button press ignored");
                (state, vec![])
            }
        };

        self.transition(next);
        effects
    }

    /// Handles a [`GameAction`] relayed from the peer or announced by the
    /// server.
    pub fn receive(&mut self, action: &GameAction) -> Vec<Effect> {
        use NegotiationState::*;
        use Offer::*;

        let (next, effects) = match (self.state, action.action) {
            (_, kind) if kind.is_terminal() => {
                (ResultShown, vec![Effect::Status(result_text(action))])
            }
            (ResultShown, ActionKind::DrawOffer) => {
                tracing::debug!("draw offer after game end ignored");
                (ResultShown, vec![])
            }
            (_, ActionKind::DrawOffer) => (
                PeerOffered(Draw),
                vec![status("Your opponent offers a draw")],
            ),
            (AwaitingPeer(Draw), ActionKind::DrawAccept) => {
                (Idle, vec![status("Draw offer accepted")])
            }
            (AwaitingPeer(Draw), ActionKind::DrawReject) => {
                (Idle, vec![status("Draw offer declined")])
            }
            (
                ResultShown | AwaitingPeer(Rematch) | PeerOffered(Rematch),
                ActionKind::RematchOffer,
            ) => (
                PeerOffered(Rematch),
                vec![status("Your opponent wants a rematch")],
            ),
            (AwaitingPeer(Rematch), ActionKind::RematchAccept) => {
                (Idle, vec![status("Rematch accepted")])
            }
            (AwaitingPeer(Rematch), ActionKind::RematchReject) => {
                (ResultShown, vec![status("Rematch declined")])
            }
            (state, kind) => {
                tracing::debug!(%state, ?kind, "inbound action ignored");
                (state, vec![])
            }
        };

        self.transition(next);
        effects
    }

    /// A new position arrived. Moving on implicitly withdraws any
    /// in-game offer or prompt; post-game states are kept.
    pub fn on_position_update(&mut self) {
        use NegotiationState::*;

        match self.state {
            ResultShown
            | AwaitingPeer(Offer::Rematch)
            | PeerOffered(Offer::Rematch) => {}
            _ => self.transition(Idle),
        }
    }

    fn transition(&mut self, next: NegotiationState) {
        if next != self.state {
            tracing::debug!(from = %self.state, to = %next, "negotiation transition");
            self.state = next;
        }
    }
}

fn status(text: &str) -> Effect {
    Effect::Status(text.to_string())
}

fn result_text(action: &GameAction) -> String {
    if action.detail.is_empty() {
        action.action.label().to_string()
    } else {
        format!("{} by {}", action.action.label(), action.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use NegotiationState::*;
    use Offer::*;

    fn recv(n: &mut Negotiation, kind: ActionKind) -> Vec<Effect> {
        n.receive(&GameAction::new(kind))
    }

    fn sends(effects: &[Effect]) -> Vec<ActionKind> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Send(kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_idle_buttons() {
        let n = Negotiation::new();
        assert_eq!(
            n.buttons(),
            (ActionKind::DrawPrompt, ActionKind::ResignPrompt)
        );
    }

    #[test]
    fn test_resign_click_sends_nothing() {
        let mut n = Negotiation::new();
        let effects = n.press(OptionButton::Secondary);

        assert!(sends(&effects).is_empty());
        assert_eq!(n.state(), LocalPrompt);
        assert_eq!(
            n.buttons(),
            (ActionKind::ResignConfirm, ActionKind::ResignCancel)
        );
    }

    #[test]
    fn test_resign_confirm_sends_once() {
        let mut n = Negotiation::new();
        n.press(OptionButton::Secondary);
        let effects = n.press(OptionButton::Primary);

        assert_eq!(sends(&effects), vec![ActionKind::ResignConfirm]);
        assert_eq!(n.state(), Idle);
    }

    #[test]
    fn test_resign_cancel_is_silent() {
        let mut n = Negotiation::new();
        n.press(OptionButton::Secondary);
        let effects = n.press(OptionButton::Secondary);

        assert!(effects.is_empty());
        assert_eq!(n.state(), Idle);
    }

    #[test]
    fn test_draw_offer_flow_accepted() {
        let mut n = Negotiation::new();
        let effects = n.press(OptionButton::Primary);
        assert_eq!(sends(&effects), vec![ActionKind::DrawOffer]);
        assert_eq!(n.state(), AwaitingPeer(Draw));

        recv(&mut n, ActionKind::DrawAccept);
        assert_eq!(n.state(), Idle);
    }

    #[test]
    fn test_draw_offer_flow_rejected_restores_labels() {
        let mut n = Negotiation::new();
        n.press(OptionButton::Primary);
        let effects = recv(&mut n, ActionKind::DrawReject);

        assert_eq!(n.state(), Idle);
        assert_eq!(
            n.buttons(),
            (ActionKind::DrawPrompt, ActionKind::ResignPrompt)
        );
        assert_eq!(effects, vec![status("Draw offer declined")]);
    }

    #[test]
    fn test_repeated_draw_click_does_not_resend() {
        let mut n = Negotiation::new();
        n.press(OptionButton::Primary);
        let effects = n.press(OptionButton::Primary);
        assert!(sends(&effects).is_empty());
        assert_eq!(n.state(), AwaitingPeer(Draw));
    }

    #[test]
    fn test_peer_draw_offer_accept_and_reject() {
        let mut n = Negotiation::new();
        recv(&mut n, ActionKind::DrawOffer);
        assert_eq!(n.state(), PeerOffered(Draw));
        assert_eq!(
            n.buttons(),
            (ActionKind::DrawAccept, ActionKind::DrawReject)
        );
        assert_eq!(
            sends(&n.press(OptionButton::Primary)),
            vec![ActionKind::DrawAccept]
        );
        assert_eq!(n.state(), Idle);

        recv(&mut n, ActionKind::DrawOffer);
        assert_eq!(
            sends(&n.press(OptionButton::Secondary)),
            vec![ActionKind::DrawReject]
        );
        assert_eq!(n.state(), Idle);
    }

    #[test]
    fn test_incoming_offer_overwrites_pending_slot() {
        let mut n = Negotiation::new();
        n.press(OptionButton::Primary);
        recv(&mut n, ActionKind::DrawOffer);
        assert_eq!(n.state(), PeerOffered(Draw));
    }

    #[test]
    fn test_incoming_draw_offer_replaces_resign_prompt() {
        let mut n = Negotiation::new();
        n.press(OptionButton::Secondary);
        assert_eq!(n.state(), LocalPrompt);

        recv(&mut n, ActionKind::DrawOffer);
        assert_eq!(n.state(), PeerOffered(Draw));
        assert_eq!(
            n.buttons(),
            (ActionKind::DrawAccept, ActionKind::DrawReject)
        );
        assert_eq!(
            sends(&n.press(OptionButton::Primary)),
            vec![ActionKind::DrawAccept]
        );
    }

    #[test]
    fn test_terminal_result_overrides_any_pending_state() {
        for setup in [vec![], vec![ActionKind::DrawOffer]] {
            let mut n = Negotiation::new();
            n.press(OptionButton::Primary);
            for kind in setup {
                recv(&mut n, kind);
            }
            let effects = recv(&mut n, ActionKind::Win);
            assert_eq!(n.state(), ResultShown);
            assert_eq!(effects, vec![status("You win")]);
        }

        let mut n = Negotiation::new();
        n.press(OptionButton::Secondary);
        recv(&mut n, ActionKind::Lose);
        assert_eq!(n.state(), ResultShown);
    }

    #[test]
    fn test_result_text_includes_detail() {
        let mut n = Negotiation::new();
        let effects = n.receive(&GameAction {
            action: ActionKind::Lose,
            detail: "resignation".into(),
        });
        assert_eq!(effects, vec![status("You lose by resignation")]);
    }

    #[test]
    fn test_result_shown_offers_rematch_or_exit() {
        let mut n = Negotiation::new();
        recv(&mut n, ActionKind::DrawResult);
        assert_eq!(
            n.buttons(),
            (ActionKind::RematchPrompt, ActionKind::Exit)
        );

        let effects = n.press(OptionButton::Primary);
        assert_eq!(sends(&effects), vec![ActionKind::RematchOffer]);
        assert_eq!(n.state(), AwaitingPeer(Rematch));
    }

    #[test]
    fn test_exit_disconnects_without_message() {
        let mut n = Negotiation::new();
        recv(&mut n, ActionKind::Win);
        let effects = n.press(OptionButton::Secondary);
        assert_eq!(effects, vec![Effect::Disconnect]);
    }

    #[test]
    fn test_rematch_offer_from_peer() {
        let mut n = Negotiation::new();
        recv(&mut n, ActionKind::Lose);
        recv(&mut n, ActionKind::RematchOffer);
        assert_eq!(n.state(), PeerOffered(Rematch));

        let effects = n.press(OptionButton::Primary);
        assert_eq!(sends(&effects), vec![ActionKind::RematchAccept]);
        assert_eq!(n.state(), Idle);
    }

    #[test]
    fn test_rematch_rejected_by_us_returns_to_result() {
        let mut n = Negotiation::new();
        recv(&mut n, ActionKind::Lose);
        recv(&mut n, ActionKind::RematchOffer);
        let effects = n.press(OptionButton::Secondary);
        assert_eq!(sends(&effects), vec![ActionKind::RematchReject]);
        assert_eq!(n.state(), ResultShown);
    }

    #[test]
    fn test_rematch_answers_from_peer() {
        let mut n = Negotiation::new();
        recv(&mut n, ActionKind::Win);
        n.press(OptionButton::Primary);
        recv(&mut n, ActionKind::RematchReject);
        assert_eq!(n.state(), ResultShown);

        n.press(OptionButton::Primary);
        recv(&mut n, ActionKind::RematchAccept);
        assert_eq!(n.state(), Idle);
    }

    #[test]
    fn test_rematch_offer_mid_game_is_ignored() {
        let mut n = Negotiation::new();
        let effects = recv(&mut n, ActionKind::RematchOffer);
        assert!(effects.is_empty());
        assert_eq!(n.state(), Idle);
    }

    #[test]
    fn test_position_update_withdraws_in_game_offers_only() {
        let mut n = Negotiation::new();
        recv(&mut n, ActionKind::DrawOffer);
        n.on_position_update();
        assert_eq!(n.state(), Idle);

        recv(&mut n, ActionKind::Win);
        n.on_position_update();
        assert_eq!(n.state(), ResultShown);
    }
}
