// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The classification prompt sent to the vision model.
//!
//! Every classification request uses this single constant so the model
//! always sees the same rubric. Wording changes here directly affect
//! classification behavior; treat edits like a model change.

/// Instructions the vision model receives alongside each photograph.
///
/// The rubric spells out the four classes, forces a conservative call in
/// ambiguous cases, and pins the reply to a JSON shape the parser can
/// extract without guessing.
pub const CLASSIFICATION_PROMPT: &str = r#"You are an expert anesthesiologist evaluating Mallampati classification from this oral cavity photograph. This is critical for airway management assessment.

CRITICAL INSTRUCTIONS:
1. Look carefully at the ENTIRE visible oral cavity anatomy
2. Focus on what structures are CLEARLY and COMPLETELY visible
3. Be conservative in your assessment - when in doubt, choose the higher class

DETAILED Mallampati Classification Criteria:

CLASS I (Best airway):
- COMPLETE visualization of: soft palate + FULL uvula + fauces + tonsillar pillars
- All 4 structures must be clearly visible
- Tonsillar pillars (anterior and posterior) should be distinctly visible on both sides

CLASS II (Good airway):
- Visible: soft palate + uvula + fauces
- Tonsillar pillars are HIDDEN or only partially visible
- Uvula should be completely visible

CLASS III (Potentially difficult airway):
- Visible: soft palate + only BASE/TIP of uvula
- Fauces and tonsillar pillars are NOT visible
- Only the lower portion of uvula is seen

CLASS IV (Difficult airway):
- ONLY hard palate visible
- Soft palate completely hidden
- No uvula, fauces, or pillars visible

EVALUATION STEPS:
1. Can you see tonsillar pillars clearly on BOTH sides? -> If YES, likely Class I
2. Is the ENTIRE uvula visible from base to tip? -> If YES and no pillars, likely Class II
3. Can you see only the base/tip of uvula? -> If YES, likely Class III
4. Can you see only hard palate? -> If YES, Class IV

Be especially careful to distinguish between Class I and Class II based on tonsillar pillar visibility.

Respond with this exact JSON format:

{
  "mallampatiClass": 1,
  "confidence": 0.85,
  "visibleStructures": ["soft palate", "uvula", "fauces", "tonsillar pillars"],
  "reasoning": "Detailed description of exactly what anatomical structures you can identify and why this leads to your classification"
}"#;
