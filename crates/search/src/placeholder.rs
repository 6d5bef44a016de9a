//! Rotating example questions for the search box.

use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

/// Shown while the search box has focus.
pub const FOCUS_PROMPT: &str = "Ask a question or search for keywords...";

/// Time between two placeholder changes.
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(5);

const CATEGORY_QUESTIONS: &[&str] = &[
    // Industry insights
    "What are the latest trends in customer service technology?",
    "How is AI transforming the customer support industry?",
    "What metrics are most important for measuring customer satisfaction?",
    "What challenges do financial service companies face with digital engagement?",
    "How are companies adapting to remote customer service operations?",
    // Technology news
    "What are the most promising technologies for customer service in 2025?",
    "How are companies implementing chatbots effectively?",
    "What security concerns exist with customer data management?",
    "How is blockchain being used in customer service applications?",
    "What's the impact of voice recognition technology on customer experience?",
    // Product management
    "What methodologies work best for customer-centric product development?",
    "How to prioritize features for a customer service platform?",
    "What KPIs should product managers track for service applications?",
    "How to incorporate customer feedback into product roadmaps?",
    "What's the best approach to launching a new service feature?",
    // Customer service
    "What are best practices for reducing customer wait times?",
    "How to improve first-call resolution rates?",
    "What training methods work best for customer service representatives?",
    "How to balance automation with human touch in customer service?",
    "What are effective strategies for handling difficult customers?",
];

const TEAM_QUESTIONS: &[(&str, &[&str])] = &[
    (
        "Digital Engagement",
        &[
            "How to optimize customer engagement across digital channels?",
            "What metrics best measure digital customer engagement success?",
            "How to personalize digital customer interactions at scale?",
        ],
    ),
    (
        "Digital Product",
        &[
            "What frameworks help prioritize digital product features?",
            "How to balance UX and technical constraints in digital products?",
            "What are best practices for digital product testing and validation?",
        ],
    ),
    (
        "NextGen Products",
        &[
            "How are emerging technologies shaping next-generation products?",
            "What methodologies best support innovation in product development?",
            "How to identify opportunities for disruptive product innovation?",
        ],
    ),
    (
        "Product Insights",
        &[
            "What data sources provide the most valuable product insights?",
            "How to effectively translate customer feedback into product improvements?",
            "What tools best support product analytics and measurement?",
        ],
    ),
    (
        "Product Testing",
        &[
            "What are the most effective methods for usability testing?",
            "How to design test cases that uncover critical product issues?",
            "What metrics best indicate product quality and reliability?",
        ],
    ),
    (
        "Service Technology",
        &[
            "What technologies are most effective for improving service efficiency?",
            "How to evaluate new service technology investments?",
            "What service technologies have the highest ROI in customer satisfaction?",
        ],
    ),
];

/// Every example question: category questions first, then team questions.
pub fn question_pool() -> Vec<String> {
    CATEGORY_QUESTIONS
        .iter()
        .chain(TEAM_QUESTIONS.iter().flat_map(|(_, qs)| qs.iter()))
        .map(|q| q.to_string())
        .collect()
}

/// Cycles through a shuffled question pool.
///
/// The pool is shuffled once at construction and then visited round-robin.
/// Focusing the search box pauses rotation and shows [`FOCUS_PROMPT`];
/// leaving it empty on blur resumes rotation.
#[derive(Debug, Clone)]
pub struct PlaceholderRotator {
    questions: Vec<String>,
    next: usize,
    current: String,
    rotating: bool,
}

impl PlaceholderRotator {
    pub fn new(questions: Vec<String>) -> Self {
        Self::with_rng(questions, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(mut questions: Vec<String>, rng: &mut R) -> Self {
        questions.shuffle(rng);
        let mut rotator = Self {
            questions,
            next: 0,
            current: FOCUS_PROMPT.to_string(),
            rotating: true,
        };
        rotator.rotate();
        rotator
    }

    /// Placeholder currently displayed.
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    /// Timer tick: shows the next question unless rotation is paused.
    pub fn tick(&mut self) -> Option<&str> {
        if !self.rotating {
            return None;
        }
        self.rotate();
        Some(self.current.as_str())
    }

    /// The search box gained focus.
    pub fn focus(&mut self) -> &str {
        self.rotating = false;
        self.current = FOCUS_PROMPT.to_string();
        &self.current
    }

    /// The search box lost focus with `input` typed in it.
    pub fn blur(&mut self, input: &str) -> &str {
        if input.trim().is_empty() {
            self.rotating = true;
            self.rotate();
        }
        &self.current
    }

    fn rotate(&mut self) {
        let Some(question) = self.questions.get(self.next) else {
            return;
        };
        self.current = question.clone();
        self.next = (self.next + 1) % self.questions.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn rotator() -> PlaceholderRotator {
        PlaceholderRotator::with_rng(question_pool(), &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn pool_contains_every_question() {
        let pool = question_pool();
        assert_eq!(pool.len(), 38);
        assert_eq!(pool.iter().collect::<HashSet<_>>().len(), 38);
    }

    #[test]
    fn one_cycle_visits_each_question_once() {
        let mut r = rotator();
        let mut seen = vec![r.current().to_string()];
        for _ in 1..38 {
            seen.push(r.tick().unwrap().to_string());
        }
        assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 38);

        // Next tick wraps around to the first question.
        assert_eq!(r.tick().unwrap(), seen[0]);
    }

    #[test]
    fn focus_pauses_rotation() {
        let mut r = rotator();
        assert_eq!(r.focus(), FOCUS_PROMPT);
        assert!(r.tick().is_none());
        assert_eq!(r.current(), FOCUS_PROMPT);
    }

    #[test]
    fn blur_with_text_stays_paused() {
        let mut r = rotator();
        r.focus();
        assert_eq!(r.blur("pricing"), FOCUS_PROMPT);
        assert!(!r.is_rotating());
    }

    #[test]
    fn blur_with_empty_input_resumes() {
        let mut r = rotator();
        let first = r.current().to_string();
        r.focus();
        let shown = r.blur("   ").to_string();
        assert_ne!(shown, FOCUS_PROMPT);
        assert_ne!(shown, first);
        assert!(r.is_rotating());
        assert!(r.tick().is_some());
    }

    #[test]
    fn empty_pool_shows_prompt() {
        let mut r = PlaceholderRotator::new(Vec::new());
        assert_eq!(r.current(), FOCUS_PROMPT);
        assert_eq!(r.tick(), Some(FOCUS_PROMPT));
    }
}
