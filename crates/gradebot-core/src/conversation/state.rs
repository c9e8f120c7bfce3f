//! Calculator dialogue as a pure state machine.
//!
//! Idle is not a variant: a user without a `Session` is idle. Each variant
//! carries exactly the scores collected so far.

use crate::grades::{
    format_score, needed_final, parse_score, term_average, weighted_total, Tier,
    GUIDANCE_TARGETS, PASSING_AVERAGE, TERM_FLOOR,
};
use crate::texts;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Session {
    AwaitingMidterm,
    AwaitingEndterm { midterm: f64 },
    AwaitingFinal { midterm: f64, endterm: f64 },
}

/// Coarse position in the dialogue, including Idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    AwaitingMidterm,
    AwaitingEndterm,
    AwaitingFinal,
}

impl Session {
    /// Fresh session created by the "enter midterm" action.
    pub fn start() -> (Self, Reply) {
        (Session::AwaitingMidterm, Reply::AskMidterm)
    }

    pub fn stage(&self) -> Stage {
        match self {
            Session::AwaitingMidterm => Stage::AwaitingMidterm,
            Session::AwaitingEndterm { .. } => Stage::AwaitingEndterm,
            Session::AwaitingFinal { .. } => Stage::AwaitingFinal,
        }
    }
}

/// The single message a transition asks to send.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    AskMidterm,
    AskEndterm,
    AskFinal,
    /// Retry prompt for midterm/endterm (range plus the 25-point floor).
    InvalidTerm,
    /// Retry prompt for the final exam.
    InvalidFinal,
    SummerCourse,
    /// Final exam not taken yet: scores needed for 50, 70 and 90.
    Needed {
        pass: f64,
        scholarship: f64,
        top_scholarship: f64,
    },
    Result {
        total: f64,
        tier: Tier,
    },
}

impl Reply {
    pub fn is_retry(&self) -> bool {
        matches!(self, Reply::InvalidTerm | Reply::InvalidFinal)
    }

    /// Label for replies that end the dialogue, `None` otherwise.
    pub fn outcome(&self) -> Option<&'static str> {
        match self {
            Reply::SummerCourse => Some("summer_course"),
            Reply::Needed { .. } => Some("needed"),
            Reply::Result { tier, .. } => Some(tier.as_str()),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Reply::AskMidterm => texts::ASK_MIDTERM.to_string(),
            Reply::AskEndterm => texts::ASK_ENDTERM.to_string(),
            Reply::AskFinal => texts::ASK_FINAL.to_string(),
            Reply::InvalidTerm => texts::INVALID_TERM.to_string(),
            Reply::InvalidFinal => texts::INVALID_FINAL.to_string(),
            Reply::SummerCourse => texts::SUMMER_COURSE.to_string(),
            Reply::Needed {
                pass,
                scholarship,
                top_scholarship,
            } => format!(
                "Чтобы пройти курс (итог >50), набери на финале: {}. (^-^*)\n\
                 Для обычной стипендии (>70) нужно: {}. (^_^)/\n\
                 Для повышенной стипендии (>90) нужно: {}. (>‿<)",
                format_score(*pass),
                format_score(*scholarship),
                format_score(*top_scholarship),
            ),
            Reply::Result { total, tier } => {
                let verdict = match tier {
                    Tier::TopScholarship => texts::TIER_TOP_SCHOLARSHIP,
                    Tier::Scholarship => texts::TIER_SCHOLARSHIP,
                    Tier::Pass => texts::TIER_PASS,
                    Tier::Retake => texts::TIER_RETAKE,
                };
                format!("Твой итоговый балл: {}\n{verdict}", format_score(*total))
            }
        }
    }
}

/// Outcome of feeding one text input to a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// `None` ends the dialogue (back to Idle).
    pub next: Option<Session>,
    pub reply: Reply,
}

impl Transition {
    fn to(next: Session, reply: Reply) -> Self {
        Self {
            next: Some(next),
            reply,
        }
    }

    fn finish(reply: Reply) -> Self {
        Self { next: None, reply }
    }
}

fn parse_term(input: &str) -> Option<f64> {
    parse_score(input).filter(|v| *v >= TERM_FLOOR)
}

/// Apply one text input to `session`.
///
/// Rejected input returns the same session with a retry reply.
pub fn advance(session: Session, input: &str) -> Transition {
    match session {
        Session::AwaitingMidterm => match parse_term(input) {
            Some(midterm) => Transition::to(Session::AwaitingEndterm { midterm }, Reply::AskEndterm),
            None => Transition::to(session, Reply::InvalidTerm),
        },
        Session::AwaitingEndterm { midterm } => match parse_term(input) {
            None => Transition::to(session, Reply::InvalidTerm),
            Some(endterm) if term_average(midterm, endterm) < PASSING_AVERAGE => {
                Transition::finish(Reply::SummerCourse)
            }
            Some(endterm) => {
                Transition::to(Session::AwaitingFinal { midterm, endterm }, Reply::AskFinal)
            }
        },
        Session::AwaitingFinal { midterm, endterm } => match parse_score(input) {
            None => Transition::to(session, Reply::InvalidFinal),
            Some(final_exam) if final_exam == 0.0 => {
                let [pass, scholarship, top_scholarship] =
                    GUIDANCE_TARGETS.map(|target| needed_final(midterm, endterm, target));
                Transition::finish(Reply::Needed {
                    pass,
                    scholarship,
                    top_scholarship,
                })
            }
            Some(final_exam) => {
                let total = weighted_total(midterm, endterm, final_exam);
                Transition::finish(Reply::Result {
                    total,
                    tier: Tier::classify(total),
                })
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(inputs: &[&str]) -> (Option<Session>, Vec<Reply>) {
        let (mut session, first) = Session::start();
        let mut replies = vec![first];
        for input in inputs {
            let t = advance(session, input);
            replies.push(t.reply);
            match t.next {
                Some(next) => session = next,
                None => return (None, replies),
            }
        }
        (Some(session), replies)
    }

    #[test]
    fn full_dialogue_with_final_reports_tier() {
        let (session, replies) = run(&["90", "90", "85"]);
        assert_eq!(session, None);
        assert_eq!(
            replies,
            vec![
                Reply::AskMidterm,
                Reply::AskEndterm,
                Reply::AskFinal,
                Reply::Result {
                    total: weighted_total(90.0, 90.0, 85.0),
                    tier: Tier::Scholarship,
                },
            ]
        );
        assert_eq!(
            replies[3].render(),
            "Твой итоговый балл: 88.00\nОтлично! Ты получаешь стипендию! (^_^)/"
        );
    }

    #[test]
    fn zero_final_reports_needed_scores() {
        let (session, replies) = run(&["80", "80", "0"]);
        assert_eq!(session, None);
        let text = replies.last().unwrap().render();
        assert_eq!(
            text,
            "Чтобы пройти курс (итог >50), набери на финале: 5.00. (^-^*)\n\
             Для обычной стипендии (>70) нужно: 55.00. (^_^)/\n\
             Для повышенной стипендии (>90) нужно: 100.00. (>‿<)"
        );
    }

    #[test]
    fn low_average_ends_with_summer_course() {
        let (session, replies) = run(&["40", "50"]);
        assert_eq!(session, None);
        assert_eq!(replies.last(), Some(&Reply::SummerCourse));
    }

    #[test]
    fn term_floor_applies_to_midterm_and_endterm_only() {
        let t = advance(Session::AwaitingMidterm, "24.99");
        assert_eq!(t.next, Some(Session::AwaitingMidterm));
        assert_eq!(t.reply, Reply::InvalidTerm);

        let t = advance(Session::AwaitingEndterm { midterm: 80.0 }, "10");
        assert_eq!(t.next, Some(Session::AwaitingEndterm { midterm: 80.0 }));
        assert_eq!(t.reply, Reply::InvalidTerm);

        let t = advance(
            Session::AwaitingFinal {
                midterm: 80.0,
                endterm: 80.0,
            },
            "10",
        );
        assert_eq!(t.next, None);
        assert!(matches!(t.reply, Reply::Result { tier: Tier::Pass, .. }));
    }

    #[test]
    fn invalid_final_keeps_scores() {
        let session = Session::AwaitingFinal {
            midterm: 70.0,
            endterm: 60.0,
        };
        let t = advance(session, "101");
        assert_eq!(t.next, Some(session));
        assert_eq!(t.reply.render(), texts::INVALID_FINAL);
    }

    #[test]
    fn stage_reflects_variant() {
        assert_eq!(Session::AwaitingMidterm.stage(), Stage::AwaitingMidterm);
        assert_eq!(
            Session::AwaitingEndterm { midterm: 30.0 }.stage(),
            Stage::AwaitingEndterm
        );
    }

    fn arb_session() -> impl Strategy<Value = Session> {
        prop_oneof![
            Just(Session::AwaitingMidterm),
            (25.0f64..=100.0).prop_map(|midterm| Session::AwaitingEndterm { midterm }),
            (25.0f64..=100.0, 25.0f64..=100.0)
                .prop_map(|(midterm, endterm)| Session::AwaitingFinal { midterm, endterm }),
        ]
    }

    proptest! {
        #[test]
        fn valid_terms_route_by_average(midterm in 25.0f64..=100.0, endterm in 25.0f64..=100.0) {
            let t = advance(Session::AwaitingEndterm { midterm }, &endterm.to_string());
            if (midterm + endterm) / 2.0 >= PASSING_AVERAGE {
                prop_assert_eq!(t.next, Some(Session::AwaitingFinal { midterm, endterm }));
                prop_assert_eq!(t.reply, Reply::AskFinal);
            } else {
                prop_assert_eq!(t.next, None);
                prop_assert_eq!(t.reply, Reply::SummerCourse);
            }
        }

        #[test]
        fn rejected_input_changes_nothing(
            session in arb_session(),
            input in prop_oneof!["[a-zA-Z ]{0,12}", (100.01f64..1e6).prop_map(|v| v.to_string())],
        ) {
            let t = advance(session, &input);
            prop_assert_eq!(t.next, Some(session));
            prop_assert!(t.reply.is_retry());
        }
    }
}
