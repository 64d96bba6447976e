// src/services/topics.rs
use rand::Rng;
use rand::seq::SliceRandom;

/// Topics offered per session.
pub const TOPICS_PER_SESSION: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Topic {
    pub category: &'static str,
    pub questions: &'static [&'static str],
}

impl Topic {
    pub fn first_question(&self) -> &'static str {
        self.questions.first().copied().unwrap_or_default()
    }
}

pub static TOPICS: &[Topic] = &[
    Topic {
        category: "Relationship Foundations",
        questions: &[
            "What first attracted us to each other?",
            "What are the core values we share?",
            "How do we define a healthy relationship?",
        ],
    },
    Topic {
        category: "Communication & Conflict Resolution",
        questions: &[
            "How do we usually handle disagreements, and how can we improve?",
            "Do we feel heard and understood by each other?",
            "What's a small communication habit we could change to help our relationship?",
        ],
    },
    Topic {
        category: "Emotional Connection & Intimacy",
        questions: &[
            "When do we feel most emotionally connected?",
            "Are there any barriers preventing us from being fully open with each other?",
            "How do we each like to give and receive love? (Love languages)",
        ],
    },
    Topic {
        category: "Trust & Security",
        questions: &[
            "Are there any unresolved trust issues in our relationship?",
            "How can we make each other feel more secure and appreciated?",
            "What does emotional safety mean to us?",
        ],
    },
    Topic {
        category: "Personal Growth & Support",
        questions: &[
            "How can we support each other's personal goals?",
            "Have our individual needs or expectations changed over time?",
            "How do we balance independence and togetherness?",
        ],
    },
    Topic {
        category: "Future & Long-Term Goals",
        questions: &[
            "Where do we see our relationship in 5 or 10 years?",
            "How do we handle life transitions together (moving, career changes, family planning)?",
            "What traditions or habits would we like to build as a couple?",
        ],
    },
    Topic {
        category: "Daily Life & Responsibilities",
        questions: &[
            "How do we divide household and financial responsibilities?",
            "Do we feel like we have a fair balance of effort in the relationship?",
            "Are there any small adjustments that could reduce stress in our daily lives?",
        ],
    },
    Topic {
        category: "Fun & Adventure",
        questions: &[
            "What activities make us happiest together?",
            "Is there anything new we'd like to try as a couple?",
            "How can we keep our relationship exciting and spontaneous?",
        ],
    },
];

/// Uniform sample of `TOPICS_PER_SESSION` distinct topics.
pub fn sample_topics<R: Rng + ?Sized>(rng: &mut R) -> Vec<Topic> {
    TOPICS
        .choose_multiple(rng, TOPICS_PER_SESSION)
        .copied()
        .collect()
}
