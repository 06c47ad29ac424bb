// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types for the Mallampati analysis pipeline.

use serde::{Deserialize, Serialize};

/// The four grades of the modified Mallampati classification.
///
/// Serialized as the bare class number (1 through 4) so API payloads
/// match the scale clinicians use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MallampatiClass {
    /// Soft palate, uvula, fauces, and tonsillar pillars all visible.
    I = 1,
    /// Soft palate, uvula, and fauces visible; pillars obscured.
    II = 2,
    /// Soft palate and only the base of the uvula visible.
    III = 3,
    /// Only the hard palate visible.
    IV = 4,
}

impl MallampatiClass {
    /// Returns the class for a numeric grade, or `None` outside 1..=4.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(MallampatiClass::I),
            2 => Some(MallampatiClass::II),
            3 => Some(MallampatiClass::III),
            4 => Some(MallampatiClass::IV),
            _ => None,
        }
    }

    /// Returns the numeric grade (1 through 4).
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Returns the canned human-readable description of this class.
    pub fn description(self) -> &'static str {
        match self {
            MallampatiClass::I => {
                "Class I: soft palate, uvula, fauces, and tonsillar pillars fully visible"
            }
            MallampatiClass::II => {
                "Class II: soft palate, uvula, and fauces visible; tonsillar pillars hidden"
            }
            MallampatiClass::III => "Class III: soft palate and only the base of the uvula visible",
            MallampatiClass::IV => "Class IV: only the hard palate visible",
        }
    }
}

impl std::fmt::Display for MallampatiClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Class {}", self.number())
    }
}

impl TryFrom<u8> for MallampatiClass {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        MallampatiClass::from_number(n)
            .ok_or_else(|| format!("invalid Mallampati class: {n} (expected 1 through 4)"))
    }
}

impl From<MallampatiClass> for u8 {
    fn from(class: MallampatiClass) -> u8 {
        class.number()
    }
}

/// Binary sedation risk bucket derived from the Mallampati class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Classes I and II: standard intravenous sedation is appropriate.
    Low,
    /// Classes III and IV: difficult airway management is possible.
    High,
}

impl RiskLevel {
    /// Maps a class to its risk bucket. Classes I and II are low risk,
    /// classes III and IV are high risk. There is no middle bucket.
    pub fn from_class(class: MallampatiClass) -> Self {
        if class.number() <= 2 {
            RiskLevel::Low
        } else {
            RiskLevel::High
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// A Mallampati classification extracted from a vision model reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// The assessed Mallampati class.
    pub class: MallampatiClass,
    /// Model-reported confidence, clamped to `[0.0, 1.0]`.
    pub confidence: f64,
    /// Canned description of the assessed class.
    pub description: String,
    /// Anatomical structures the model reported as visible.
    pub visible_structures: Vec<String>,
    /// The model's free-text reasoning, empty when not provided.
    pub reasoning: String,
    /// True when the class was recovered by the fallback text scan
    /// instead of parsed from well-formed JSON.
    pub degraded: bool,
}

/// The risk assessment derived from a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Binary risk bucket.
    pub level: RiskLevel,
    /// Operator-facing recommendation, including any advisory notes.
    pub recommendation: String,
    /// Supporting detail for the risk call.
    pub details: String,
}

/// The complete result of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The extracted classification.
    pub mallampati: Classification,
    /// The derived risk assessment.
    pub risk: RiskAssessment,
    /// Server-assigned identifier for this analysis.
    pub image_id: String,
    /// RFC 3339 timestamp of when the analysis completed.
    pub timestamp: String,
}

/// An uploaded image awaiting analysis.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied file name, if any.
    pub file_name: Option<String>,
    /// Declared media type of the upload.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}
