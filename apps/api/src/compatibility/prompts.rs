//! Prompt Builder for the compatibility analysis.

use crate::models::links::{Link, ProfileLinks};

/// Character budget for each resume's extracted text.
pub const MAX_RESUME_CHARS: usize = 10_000;

pub const TRUNCATION_MARKER: &str = "... [truncated]";

const NOT_PROVIDED: &str = "Not provided";

/// Builds the compatibility prompt from both candidates' extracted text and
/// links. Pure: the same inputs always produce the same prompt.
///
/// Resume text is inserted in a single formatting pass, so placeholder-like
/// text inside a resume is never substituted.
pub fn build_prompt(
    person1_text: &str,
    person1_links: &ProfileLinks,
    person2_text: &str,
    person2_links: &ProfileLinks,
) -> String {
    format!(
        r#"Act as a Corporate Love Guru analyzing two professionals' compatibility. Consider their resumes and social links and generate the answer in the form of a conversation with person 1, the person asking about their partner.

Person 1 is the person who is checking:
{person1_resume}
LinkedIn: {person1_linkedin}
GitHub: {person1_github}
LeetCode: {person1_leetcode}

Person 2 is the crush or partner:
{person2_resume}
LinkedIn: {person2_linkedin}
GitHub: {person2_github}
LeetCode: {person2_leetcode}

Generate a JSON response with:
- "matchScore": 0-100 romantic compatibility based on career alignment and interests
- "referralScore": 0-100 likelihood of professional referrals
- "loveCompatibility": 2 sentence playful analysis with corporate jargon and emojis
- "professionalSynergy": 2 sentence collaboration potential analysis
- "competitiveAnalysis": fun comparison using the LeetCode information and the other provided links
- "recommendation": fun 1-sentence recommendation with emojis

Format: {{
  "matchScore": number,
  "referralScore": number,
  "loveCompatibility": string,
  "professionalSynergy": string,
  "competitiveAnalysis": string,
  "recommendation": string
}}"#,
        person1_resume = truncate_resume(person1_text),
        person1_linkedin = render_link(&person1_links.linkedin),
        person1_github = render_link(&person1_links.github),
        person1_leetcode = render_link(&person1_links.leetcode),
        person2_resume = truncate_resume(person2_text),
        person2_linkedin = render_link(&person2_links.linkedin),
        person2_github = render_link(&person2_links.github),
        person2_leetcode = render_link(&person2_links.leetcode),
    )
}

/// Keeps the first `MAX_RESUME_CHARS` characters, marking the cut if any.
pub fn truncate_resume(text: &str) -> String {
    match text.char_indices().nth(MAX_RESUME_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}

fn render_link(link: &Link) -> String {
    match link {
        Link::Raw { url } if url.trim().is_empty() => NOT_PROVIDED.to_string(),
        Link::Raw { url } => url.clone(),
        Link::Enriched { profile, .. } => profile.to_string(),
    }
}
