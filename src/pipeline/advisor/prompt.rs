//! Prompts for the two provider stages.
//!
//! Content generation gets the findings summary and free-form instructions;
//! JSON structuring gets the generated plan plus the exact schema to emit.
//! The two are deliberately independent — a model that reasons well about
//! findings is not necessarily a model that emits strict JSON.

/// Build the content-generation prompt from the findings summary text.
pub fn build_content_prompt(findings_text: &str) -> String {
    format!(
        r#"You are assisting with general wellness guidance based on lab report findings.

**Findings:**
{findings_text}

**Instructions:**
1. Diet: suggest specific foods to eat and foods to avoid that address the findings above.
2. Exercise: recommend safe, appropriate activities with frequency and duration.
3. Lifestyle: give practical day-to-day guidance (sleep, hydration, stress, follow-up).
4. Disclaimer: state clearly that this is not a substitute for professional medical advice.
5. Use clear headings for each section. No conversational intro or conclusion."#
    )
}

/// Build the JSON-structuring prompt around the free-form plan text.
pub fn build_formatting_prompt(plan_text: &str) -> String {
    format!(
        r#"Convert the following health plan into a structured JSON object.
Extract the information accurately and follow the specified format exactly.

**Input text:**
---
{plan_text}
---

**Required JSON structure (copy this format exactly):**
{{
  "diet": [
    {{"item": "Leafy greens", "action": "include", "reason": "supports iron intake"}},
    {{"item": "Processed meat", "action": "avoid", "reason": "high sodium"}}
  ],
  "exercise": [
    {{"activity": "Walking", "frequency": "Daily", "duration": "30 minutes per session"}}
  ],
  "lifestyle": [
    {{"advice": "Sleep 7-8 hours per night", "category": "sleep"}}
  ],
  "disclaimer": "Information provided is for general use only and is not a substitute for professional medical advice."
}}

CRITICAL REQUIREMENTS:
1. Output ONLY valid JSON - no markdown, no explanations, no extra text.
2. All four keys (diet, exercise, lifestyle, disclaimer) are required and must be non-empty.
3. "action" is either "include" or "avoid".
4. All strings in double quotes, no trailing commas.

Your response:"#
    )
}
