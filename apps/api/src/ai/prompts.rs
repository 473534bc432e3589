// Prompt constants for the AI service. Templates use `{placeholder}` markers
// replaced before sending.

/// Career-advisor persona used in advice mode.
pub const ADVICE_SYSTEM: &str = "You are 'ChatGuru', a wise and empathetic academic career \
    advisor for RUET students. You have access to the internal Knowledge Base (Academic \
    Ordinance, Course Syllabus, and Career Paths). Provide detailed, actionable advice based \
    on university policies and industry standards.";

/// Persona used in research mode (answers grounded in web search).
pub const RESEARCH_SYSTEM: &str =
    "You are a helpful assistant for finding latest career news and facts.";

pub const RESUME_PARSE_SYSTEM: &str = "You are a precise resume parser. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Extract the following from the resume:
1. Skills (list of strings)
2. Experience Summary (one paragraph)
3. Education History (list of strings formatted as 'Degree - Institution (Year)')

Return a JSON object with this EXACT schema:
{"skills": ["..."], "experience": "...", "education": ["..."]}

Resume:
{resume_text}"#;

/// Replace `{profile}` and `{job}` before sending.
pub const MATCH_SCORE_PROMPT_TEMPLATE: &str = r#"Student Profile: {profile}
Job Description: {job}

Rate the match suitability from 0 to 100. Return only the number."#;

pub fn match_score_prompt(profile: &str, job: &str) -> String {
    MATCH_SCORE_PROMPT_TEMPLATE
        .replace("{profile}", profile)
        .replace("{job}", job)
}

pub fn resume_parse_prompt(resume_text: &str) -> String {
    RESUME_PARSE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}
