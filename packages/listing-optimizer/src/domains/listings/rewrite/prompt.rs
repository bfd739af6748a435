//! Instruction template for listing rewrites.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::SPAM_SENTINEL;
use crate::domains::listings::models::GenerationRequest;

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(r"\{(sentinel|title|description|category|location)\}").unwrap();
}

const REWRITE_PROMPT_TEMPLATE: &str = r#"You are an SEO specialist for user-generated job listings. Rewrite the raw listing below into a unique, professional listing that ranks well in search. Write the output in natural Turkish.

## TITLE RULES
- Length: between 50 and 60 characters.
- Put the job title first, then the location (city or "Uzaktan").
- Add one hook that raises click-through (experience level, bonus, urgency, pay).

## DESCRIPTION RULES
- Length: 1000 to 1500 characters. Never exceed 1700 characters.
- Open with the main promise of the job and its location.
- Focus on why the job matters to the applicant; enrich pay range and benefits (SGK, health insurance, bonus, meal card) when the listing mentions them.
- Flowing paragraphs, no bullet lists.
- Keep the employer name, pay and contact details that appear in the original.
- End with a clear call to action.

## SPAM FILTER (highest priority)
If the original description is not a job listing (menus, political content, unrelated personal ads), write exactly "{sentinel}" as both the new title and the new description.

## INPUT
- Original title: {title}
- Original description: {description}
- Category: {category}
- Location: {location}

## OUTPUT
Respond with a single JSON object and nothing else:
{
  "new_title": "SEO title (50-60 characters)",
  "new_description": "unique SEO description (1000-1500 characters)"
}"#;

/// Build the rewrite prompt with the request fields embedded verbatim.
///
/// Substitution is a single pass over the template, so braces inside the
/// listing text are never expanded.
pub fn build_rewrite_prompt(request: &GenerationRequest) -> String {
    PLACEHOLDER_REGEX
        .replace_all(REWRITE_PROMPT_TEMPLATE, |caps: &Captures| match &caps[1] {
            "sentinel" => SPAM_SENTINEL.to_string(),
            "title" => request.title.clone(),
            "description" => request.description.clone(),
            "category" => request.category.clone(),
            _ => request.location.clone(),
        })
        .into_owned()
}
