// Prompt constants for the model-backed scorer.

/// ATS scoring prompt template. Replace `{job_text}` and `{resume_text}` before sending.
pub const ATS_SCORE_PROMPT_TEMPLATE: &str = "Job Description:
{job_text}

Resume:
{resume_text}

Analyze the resume and job description. Provide an ATS score based on how well the resume matches the job description. Also, suggest any improvements for the resume to better align with the job description.
Start your answer with a line of the form \"ATS Score: <number between 0 and 100>\".";

/// Embeds both texts verbatim.
pub fn build_ats_prompt(job_text: &str, resume_text: &str) -> String {
    // Resume first, then only the first job placeholder: neither text can expand one inside the other.
    ATS_SCORE_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replacen("{job_text}", job_text, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_texts_verbatim() {
        let prompt = build_ats_prompt("Rust engineer\nAWS", "Python developer");
        assert!(prompt.contains("Job Description:\nRust engineer\nAWS\n"));
        assert!(prompt.contains("Resume:\nPython developer\n"));
        assert!(prompt.contains("ATS Score:"));
        assert!(!prompt.contains("{job_text}"));
    }
}
