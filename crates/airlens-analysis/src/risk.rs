// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sedation risk assessment derived from a classification.
//!
//! The mapping is fixed: Class I and II are low risk, Class III and IV
//! are high risk. The recommendation text carries advisories when the
//! classification itself looks shaky, so downstream consumers see the
//! caveat next to the advice rather than in a separate field.

use airlens_core::{Classification, MallampatiClass, RiskAssessment, RiskLevel};

/// Below this confidence the recommendation carries a re-capture note.
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;

const LOW_CONFIDENCE_NOTE: &str = " Note: image quality or angle reduced the confidence of \
     this assessment. Consider re-evaluating with a better capture if possible.";

const PILLAR_CHECK_NOTE: &str = " Verification needed: Class I requires visible tonsillar \
     pillars; please re-check pillar visibility.";

/// Maps a classification to a risk level and recommendation.
pub fn assess(classification: &Classification) -> RiskAssessment {
    let class = classification.class;
    let level = RiskLevel::from_class(class);
    let mut recommendation = base_recommendation(class, level);

    if classification.confidence < LOW_CONFIDENCE_THRESHOLD {
        recommendation.push_str(LOW_CONFIDENCE_NOTE);
    }

    // A genuine Class I view includes the tonsillar pillars. When the
    // model claims Class I without mentioning them, flag it.
    if class == MallampatiClass::I && !mentions_tonsillar_pillars(&classification.visible_structures)
    {
        recommendation.push_str(PILLAR_CHECK_NOTE);
    }

    RiskAssessment {
        level,
        recommendation,
        details: risk_details(class, level),
    }
}

fn base_recommendation(class: MallampatiClass, level: RiskLevel) -> String {
    let n = class.number();
    match level {
        RiskLevel::High => format!(
            "High risk identified (Mallampati Class {n}). Consider anesthesiologist \
             consultation and prepare for potential difficult airway management. \
             Alternative sedation methods or general anesthesia may be required."
        ),
        RiskLevel::Low => format!(
            "Low risk identified (Mallampati Class {n}). Standard intravenous sedation \
             can be safely administered with routine monitoring."
        ),
    }
}

fn risk_details(class: MallampatiClass, level: RiskLevel) -> String {
    let n = class.number();
    match level {
        RiskLevel::High => format!(
            "Mallampati Class {n} indicates elevated risk under intravenous sedation. \
             Difficult airway management is possible; specialist evaluation is recommended."
        ),
        RiskLevel::Low => format!(
            "Mallampati Class {n} indicates low risk under intravenous sedation. \
             Endoscopy under standard monitoring is appropriate."
        ),
    }
}

fn mentions_tonsillar_pillars(structures: &[String]) -> bool {
    structures
        .iter()
        .any(|s| s.to_lowercase().contains("tonsillar pillar"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(class: MallampatiClass, confidence: f64) -> Classification {
        Classification {
            class,
            confidence,
            description: class.description().to_owned(),
            visible_structures: vec![
                "soft palate".into(),
                "uvula".into(),
                "tonsillar pillars".into(),
            ],
            reasoning: String::new(),
            degraded: false,
        }
    }

    #[test]
    fn classes_one_and_two_are_low_risk() {
        for class in [MallampatiClass::I, MallampatiClass::II] {
            let risk = assess(&classification(class, 0.9));
            assert_eq!(risk.level, RiskLevel::Low);
            assert!(risk.recommendation.starts_with(&format!(
                "Low risk identified (Mallampati Class {})",
                class.number()
            )));
            assert!(risk.details.contains("low risk under intravenous sedation"));
        }
    }

    #[test]
    fn classes_three_and_four_are_high_risk() {
        for class in [MallampatiClass::III, MallampatiClass::IV] {
            let risk = assess(&classification(class, 0.9));
            assert_eq!(risk.level, RiskLevel::High);
            assert!(risk.recommendation.starts_with(&format!(
                "High risk identified (Mallampati Class {})",
                class.number()
            )));
            assert!(risk.recommendation.contains("anesthesiologist"));
            assert!(risk.details.contains("elevated risk"));
        }
    }

    #[test]
    fn low_confidence_appends_a_note() {
        let risk = assess(&classification(MallampatiClass::II, 0.5));
        assert!(risk.recommendation.contains("Note: image quality or angle"));
    }

    #[test]
    fn threshold_confidence_gets_no_note() {
        // The check is strictly below 0.7.
        let risk = assess(&classification(MallampatiClass::II, 0.7));
        assert!(!risk.recommendation.contains("Note: image quality"));
    }

    #[test]
    fn class_one_without_pillars_is_flagged() {
        let mut c = classification(MallampatiClass::I, 0.9);
        c.visible_structures = vec!["soft palate".into(), "uvula".into()];
        let risk = assess(&c);
        assert!(risk.recommendation.contains("Verification needed"));
    }

    #[test]
    fn class_one_with_pillars_is_not_flagged() {
        let risk = assess(&classification(MallampatiClass::I, 0.9));
        assert!(!risk.recommendation.contains("Verification needed"));
    }

    #[test]
    fn pillar_mention_is_case_insensitive_and_substring() {
        let mut c = classification(MallampatiClass::I, 0.9);
        c.visible_structures = vec!["Anterior Tonsillar Pillar clearly seen".into()];
        let risk = assess(&c);
        assert!(!risk.recommendation.contains("Verification needed"));
    }

    #[test]
    fn pillar_flag_only_applies_to_class_one() {
        let mut c = classification(MallampatiClass::III, 0.9);
        c.visible_structures.clear();
        let risk = assess(&c);
        assert!(!risk.recommendation.contains("Verification needed"));
    }

    #[test]
    fn degraded_fallback_collects_both_advisories() {
        let c = Classification {
            class: MallampatiClass::I,
            confidence: 0.6,
            description: MallampatiClass::I.description().to_owned(),
            visible_structures: Vec::new(),
            reasoning: String::new(),
            degraded: true,
        };
        let risk = assess(&c);
        assert!(risk.recommendation.contains("Note: image quality"));
        assert!(risk.recommendation.contains("Verification needed"));
    }
}
