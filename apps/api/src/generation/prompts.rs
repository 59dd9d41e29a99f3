//! Prompt construction for the AI coach: cover letters, quiz questions,
//! and post-quiz improvement tips. Tone maps to explicit phrasing
//! instructions so the caller never free-forms style into the prompt.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interview::QuizReview;

/// Writing tone requested for generated cover letters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Conversational,
    Enthusiastic,
    Formal,
}

impl Tone {
    /// The style instruction injected into the prompt.
    pub fn instruction(&self) -> &'static str {
        match self {
            Tone::Professional => {
                "Use a confident, polished business voice. Concrete and direct, \
                 no slang, no exclamation marks."
            }
            Tone::Conversational => {
                "Use a warm, approachable voice, as if writing to a future \
                 colleague. Contractions are fine; keep it tight."
            }
            Tone::Enthusiastic => {
                "Use an energetic voice that shows genuine excitement about the \
                 role. At most one exclamation mark in the whole letter."
            }
            Tone::Formal => {
                "Use a traditional, reserved business-letter voice. No \
                 contractions, no colloquialisms."
            }
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Professional => "professional",
            Tone::Conversational => "conversational",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Formal => "formal",
        };
        f.write_str(name)
    }
}

/// Job/company context for a cover-letter generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationContext {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    #[serde(default)]
    pub tone: Tone,
}

pub const COVER_LETTER_SYSTEM: &str = "You are an expert career coach who writes \
cover letters that are specific, grounded in the job description, and free of \
filler. You write in markdown and never invent facts about the candidate.";

pub fn cover_letter_prompt(ctx: &GenerationContext) -> String {
    format!(
        "Write a cover letter for the {title} position at {company}.\n\
         \n\
         Job description:\n{jd}\n\
         \n\
         Requirements:\n\
         - Business letter structure in markdown: greeting, three body \
         paragraphs, sign-off.\n\
         - At most 350 words.\n\
         - Reference specific requirements from the job description; do not \
         restate the whole posting.\n\
         - {tone}\n\
         \n\
         Return only the letter, no preamble.",
        title = ctx.job_title,
        company = ctx.company_name,
        jd = ctx.job_description,
        tone = ctx.tone.instruction(),
    )
}

pub const QUIZ_SYSTEM: &str = "You are a technical interviewer. You return only \
valid JSON, with no markdown fences and no commentary.";

/// Number of questions per generated quiz.
pub const QUIZ_QUESTION_COUNT: usize = 10;

pub fn quiz_prompt(industry: &str, skills: &[String]) -> String {
    let skills_clause = if skills.is_empty() {
        String::new()
    } else {
        format!(" with a focus on {}", skills.join(", "))
    };
    format!(
        "Generate {count} multiple-choice technical interview questions for a \
         {industry} professional{skills_clause}.\n\
         \n\
         Each question has exactly 4 options, one correct answer, and a short \
         explanation of why that answer is correct.\n\
         \n\
         Return JSON in exactly this shape:\n\
         {{\"questions\": [{{\"question\": \"...\", \"options\": [\"...\", \
         \"...\", \"...\", \"...\"], \"correct_answer\": \"...\", \
         \"explanation\": \"...\"}}]}}",
        count = QUIZ_QUESTION_COUNT,
    )
}

pub const TIP_SYSTEM: &str = "You are an encouraging career coach. You answer in \
at most two sentences and never mention mistakes question-by-question.";

/// Built only when the user answered something wrong.
pub fn improvement_tip_prompt(industry: &str, wrong: &[&QuizReview]) -> String {
    let gaps: Vec<String> = wrong
        .iter()
        .map(|r| format!("- {}\n  Given answer: {}", r.question, r.user_answer))
        .collect();
    format!(
        "A {industry} candidate missed these interview questions:\n\
         {gaps}\n\
         \n\
         Give one specific, encouraging improvement tip focused on what to \
         study next. Do not repeat the questions.",
        gaps = gaps.join("\n"),
    )
}
