// All prompt templates for the generation features.
// Placeholders are filled with llm_client::prompts::fill_template.
// Cross-cutting instructions ({json_only}, {plain_text}) come from llm_client::prompts.

/// Resume analysis. Replace: {json_only}, {resume_text}
pub const RESUME_ANALYSIS_TEMPLATE: &str = r#"Analyze the following resume and structure it into a professional portfolio.

Return a JSON object with these keys:
{
  "Name": "Full name of the person, or an empty string",
  "About Me": "A short professional summary",
  "Skills": ["Skill", "..."],
  "Work Experience": [
    {"Company": "", "Designation": "", "Duration": "", "Description": ""}
  ],
  "Projects": [
    {"Name": "", "Description": ""}
  ],
  "Education": [
    {"Degree": "", "Institution": "", "Board": "", "Description": ""}
  ]
}

Use empty strings or empty arrays for anything the resume does not mention.
{json_only}

Resume text:
{resume_text}"#;

/// Job description analysis. Replace: {json_only}, {job_text}
pub const JOB_ANALYSIS_TEMPLATE: &str = r#"Analyze the following job description.

Return a JSON object with EXACTLY these keys, each a single string:
{
  "RequiredSkills": "Skills the role requires",
  "PreferredSkills": "Nice-to-have skills",
  "ExperienceLevel": "Junior / Mid / Senior / Lead, with years if stated",
  "KeyResponsibilities": "Main duties of the role",
  "TechnicalRequirements": "Tools, platforms and technologies",
  "SoftSkills": "Interpersonal and communication expectations"
}

{json_only}

Job description:
{job_text}"#;

/// Resume optimization. Replace: {plain_text}, {resume_text}, {job_analysis}
pub const OPTIMIZE_RESUME_TEMPLATE: &str = r#"Rewrite the resume below so it targets the analyzed job.
Keep every fact truthful; reorder, rephrase and emphasize, but never invent experience.
Mirror the required skills and responsibilities where the resume supports them.

Job analysis:
{job_analysis}

Resume:
{resume_text}

{plain_text}"#;

/// Cover letter. Replace: {plain_text}, {job_text}, {resume_text}
pub const COVER_LETTER_TEMPLATE: &str = r#"Write a cover letter for the job description below, based on the candidate's resume.
Keep it to at most three paragraphs. Address the letter to the hiring manager.
Reference concrete experience from the resume that matches the role.

Job description:
{job_text}

Resume:
{resume_text}

{plain_text}"#;

/// Career guide. Replace: {plain_text}, {job_text}, {resume_text}
pub const CAREER_GUIDE_TEMPLATE: &str = r#"Create a career guide for a candidate preparing for the job below.
Organize it into numbered sections:
1. Fit summary
2. Skill gaps and how to close them
3. Learning resources
4. Interview preparation tips
5. 30-60-90 day plan

Job description:
{job_text}

Resume:
{resume_text}

{plain_text}"#;

/// Interview questions. Replace: {json_only}, {count}, {level}, {job_text}
pub const INTERVIEW_QUESTIONS_TEMPLATE: &str = r#"Generate exactly {count} mock interview questions for a {level} candidate applying to the job below.
Mix technical and behavioral questions, ordered from warm-up to hardest.

Return a JSON array of exactly {count} strings:
["Question one?", "Question two?"]

{json_only}

Job description:
{job_text}"#;

/// Interview scoring, bare integer reply. Replace: {transcript}
pub const INTERVIEW_SCORE_BARE_TEMPLATE: &str = r#"Score the candidate's mock interview below from 0 to 100, where 100 is an outstanding hire.
Judge relevance, depth, clarity and correctness of each answer.

Return ONLY the integer score. No words, no punctuation, no explanation.

Interview transcript:
{transcript}"#;

/// Interview scoring, JSON reply. Replace: {json_only}, {transcript}
pub const INTERVIEW_SCORE_OBJECT_TEMPLATE: &str = r#"Score the candidate's mock interview below from 0 to 100, where 100 is an outstanding hire.
Judge relevance, depth, clarity and correctness of each answer.

Return a JSON object:
{"score": 0, "rationale": "One sentence explaining the score"}

{json_only}

Interview transcript:
{transcript}"#;

/// Interview feedback. Replace: {plain_text}, {score}, {transcript}
pub const INTERVIEW_FEEDBACK_TEMPLATE: &str = r#"The candidate below scored {score}/100 in a mock interview.
Give constructive feedback: what went well, what to improve, and one concrete tip per weak answer.

Interview transcript:
{transcript}

{plain_text}"#;

/// Portfolio enhancement. Replace: {json_only}, {resume_json}, {job_text}
pub const ENHANCE_PORTFOLIO_TEMPLATE: &str = r#"Tailor the portfolio data below to the target job.
Rewrite "About Me" and each description to emphasize relevant experience, and reorder "Skills" by relevance.
Do not invent employers, degrees, projects or skills that are not already present.

Return a JSON object with the same keys as the input.
{json_only}

Portfolio data:
{resume_json}

Target job:
{job_text}"#;

/// About Me prose. Replace: {plain_text}, {resume_json}
pub const ABOUT_ME_TEMPLATE: &str = r#"Write a detailed, engaging About Me section for a portfolio website, based on the following information about the person:
{resume_json}

Write in the first person, two short paragraphs at most.
{plain_text}"#;

/// Skills summary. Replace: {plain_text}, {skills}
pub const SKILLS_SUMMARY_TEMPLATE: &str = r#"Given this list of skills, write a short, human-like summary (1-2 sentences) describing the person's skills for a portfolio website.
Skills: {skills}

Do NOT return a list or bullet points. Do NOT repeat the skill names verbatim.
{plain_text}"#;
