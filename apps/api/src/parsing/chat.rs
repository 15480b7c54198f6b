//! Chat interview session: the question script and answer-to-resume mapping.
//!
//! A `ChatSession` is a plain value: the service layer loads it, records an
//! answer, and stores it again. Nothing here knows where it is kept.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::resume::{FromParts, StructuredResume};
use crate::parsing::records::{
    parse_delimited_records, parse_skill_list, FieldSchema, EDUCATION_SCHEMA, PROJECT_SCHEMA,
    WORK_EXPERIENCE_SCHEMA,
};

/// Questions asked in order. Answer `i` answers `CHAT_QUESTIONS[i]`.
pub const CHAT_QUESTIONS: &[&str] = &[
    "What is your full name?",
    "What is your most recent job title?",
    "List your top skills (comma or newline separated).",
    "Describe your work experience (e.g., Company|Designation|Duration|Description; ...). \
     For example: Acme Corp|Software Engineer|2019-2021|Built the billing platform; \
     Globex|Team Lead|2021-2023",
    "List your projects (e.g., Name|Description; ...). \
     For example: PortfolioAI|Generates portfolio sites from resumes; Budget Bot|Slack expense tracker",
    "List your education (e.g., Degree|Institution|Board|Description; ...). \
     For example: Bachelor in Commerce|Hinduja College of Commerce, Mumbai|Maharashtra State Board|Top 10% of class; \
     HSC|Siddharth College, Churchgate, Mumbai|Maharashtra State Board; \
     SSC|St. Xaviers High School, Fort, Mumbai|Maharashtra State Board",
];

const NAME: usize = 0;
const JOB_TITLE: usize = 1;
const SKILLS: usize = 2;
const WORK_EXPERIENCE: usize = 3;
const PROJECTS: usize = 4;
const EDUCATION: usize = 5;

/// Progress of one chat-driven portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub portfolio_id: Uuid,
    pub user_id: Uuid,
    /// Optional job description to tailor the finished portfolio against.
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub answers: Vec<String>,
}

impl ChatSession {
    pub fn new(portfolio_id: Uuid, user_id: Uuid, job_description: Option<String>) -> Self {
        Self {
            portfolio_id,
            user_id,
            job_description,
            answers: Vec::new(),
        }
    }

    /// The question awaiting an answer, or `None` once every question is answered.
    pub fn current_question(&self) -> Option<&'static str> {
        CHAT_QUESTIONS.get(self.answers.len()).copied()
    }

    /// Records an answer to the current question and returns the next one.
    /// Answers past the end of the script are ignored.
    pub fn record_answer(&mut self, answer: &str) -> Option<&'static str> {
        if !self.is_complete() {
            self.answers.push(answer.trim().to_string());
        }
        self.current_question()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= CHAT_QUESTIONS.len()
    }

    /// Maps the collected answers onto a `StructuredResume`.
    /// Unanswered questions leave their sections empty.
    pub fn to_structured_resume(&self) -> StructuredResume {
        let answer = |idx: usize| self.answers.get(idx).map(String::as_str).unwrap_or("");

        let name = answer(NAME);
        let title = answer(JOB_TITLE);
        let about_me = [name, title]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ");

        StructuredResume {
            name: (!name.is_empty()).then(|| name.to_string()),
            about_me,
            skills: parse_skill_list(answer(SKILLS)),
            work_experience: records_as(answer(WORK_EXPERIENCE), &WORK_EXPERIENCE_SCHEMA),
            projects: records_as(answer(PROJECTS), &PROJECT_SCHEMA),
            education: records_as(answer(EDUCATION), &EDUCATION_SCHEMA),
        }
    }
}

fn records_as<T: FromParts>(answer: &str, schema: &FieldSchema) -> Vec<T> {
    parse_delimited_records(answer, schema)
        .iter()
        .map(|record| T::from_parts(record.values()))
        .collect()
}
