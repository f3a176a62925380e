use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::DesignError;

/// Quantification scheme of an experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelType {
    /// Label-free quantification
    #[serde(rename = "LFQ")]
    Lfq,
    /// Tandem mass tags
    #[serde(rename = "TMT")]
    Tmt,
    /// Isobaric tags for relative and absolute quantitation
    #[serde(rename = "ITRAQ")]
    Itraq,
}

impl LabelType {
    /// Whether samples are multiplexed into channels of the same run
    pub fn is_multiplexed(&self) -> bool {
        !matches!(self, LabelType::Lfq)
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelType::Lfq => write!(f, "LFQ"),
            LabelType::Tmt => write!(f, "TMT"),
            LabelType::Itraq => write!(f, "ITRAQ"),
        }
    }
}

/// Fixed label-name to channel-number table of an isobaric kit
#[derive(Debug, PartialEq, Eq)]
pub struct ChannelMap {
    name: &'static str,
    channels: &'static [(&'static str, u32)],
}

impl ChannelMap {
    /// Kit name, e.g. "TMT10plex"
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of channels in the kit
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Always false, every kit has channels
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channel number for a label name, case-insensitive.
    ///
    /// Unknown labels return `None` and surface as missing channels downstream.
    pub fn channel(&self, label: &str) -> Option<u32> {
        let label = label.trim();
        self.channels
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .map(|(_, channel)| *channel)
    }
}

/// TMT 16-plex (TMTpro)
pub const TMT16PLEX: ChannelMap = ChannelMap {
    name: "TMT16plex",
    channels: &[
        ("TMT126", 1),
        ("TMT127N", 2),
        ("TMT127C", 3),
        ("TMT128N", 4),
        ("TMT128C", 5),
        ("TMT129N", 6),
        ("TMT129C", 7),
        ("TMT130N", 8),
        ("TMT130C", 9),
        ("TMT131N", 10),
        ("TMT131C", 11),
        ("TMT132N", 12),
        ("TMT132C", 13),
        ("TMT133N", 14),
        ("TMT133C", 15),
        ("TMT134N", 16),
    ],
};

/// TMT 11-plex
pub const TMT11PLEX: ChannelMap = ChannelMap {
    name: "TMT11plex",
    channels: &[
        ("TMT126", 1),
        ("TMT127N", 2),
        ("TMT127C", 3),
        ("TMT128N", 4),
        ("TMT128C", 5),
        ("TMT129N", 6),
        ("TMT129C", 7),
        ("TMT130N", 8),
        ("TMT130C", 9),
        ("TMT131N", 10),
        ("TMT131C", 11),
    ],
};

/// TMT 10-plex
pub const TMT10PLEX: ChannelMap = ChannelMap {
    name: "TMT10plex",
    channels: &[
        ("TMT126", 1),
        ("TMT127N", 2),
        ("TMT127C", 3),
        ("TMT128N", 4),
        ("TMT128C", 5),
        ("TMT129N", 6),
        ("TMT129C", 7),
        ("TMT130N", 8),
        ("TMT130C", 9),
        ("TMT131", 10),
    ],
};

/// TMT 6-plex
pub const TMT6PLEX: ChannelMap = ChannelMap {
    name: "TMT6plex",
    channels: &[
        ("TMT126", 1),
        ("TMT127", 2),
        ("TMT128", 3),
        ("TMT129", 4),
        ("TMT130", 5),
        ("TMT131", 6),
    ],
};

/// iTRAQ 4-plex
pub const ITRAQ4PLEX: ChannelMap = ChannelMap {
    name: "ITRAQ4plex",
    channels: &[("ITRAQ114", 1), ("ITRAQ115", 2), ("ITRAQ116", 3), ("ITRAQ117", 4)],
};

/// iTRAQ 8-plex
pub const ITRAQ8PLEX: ChannelMap = ChannelMap {
    name: "ITRAQ8plex",
    channels: &[
        ("ITRAQ113", 1),
        ("ITRAQ114", 2),
        ("ITRAQ115", 3),
        ("ITRAQ116", 4),
        ("ITRAQ117", 5),
        ("ITRAQ118", 6),
        ("ITRAQ119", 7),
        ("ITRAQ121", 8),
    ],
};

/// Channels that only exist in the 16-plex kit
const TMT16_MARKERS: [&str; 5] = ["TMT134N", "TMT133C", "TMT133N", "TMT132C", "TMT132N"];

/// Infer the label type and channel map from the distinct label values of a design.
///
/// A single distinct label means label-free. Otherwise the label set must mention
/// TMT or iTRAQ (case-insensitive) and the kit is chosen by how many distinct
/// labels are present and which channels appear.
pub fn resolve_label<I, S>(labels: I) -> Result<(LabelType, Option<&'static ChannelMap>), DesignError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let labels: BTreeSet<String> = labels
        .into_iter()
        .map(|l| l.as_ref().trim().to_string())
        .collect();

    if labels.len() == 1 {
        return Ok((LabelType::Lfq, None));
    }

    let upper: BTreeSet<String> = labels.iter().map(|l| l.to_ascii_uppercase()).collect();
    let contains = |marker: &str| upper.iter().any(|l| l.contains(marker));

    if contains("TMT") {
        let choice = if labels.len() > 11 || TMT16_MARKERS.iter().any(|m| upper.contains(*m)) {
            &TMT16PLEX
        } else if labels.len() == 11 || upper.contains("TMT131C") {
            &TMT11PLEX
        } else if labels.len() > 6 {
            &TMT10PLEX
        } else {
            &TMT6PLEX
        };
        Ok((LabelType::Tmt, Some(choice)))
    } else if contains("ITRAQ") {
        let choice = if labels.len() > 4 { &ITRAQ8PLEX } else { &ITRAQ4PLEX };
        Ok((LabelType::Itraq, Some(choice)))
    } else {
        Err(DesignError::UnsupportedLabelType(labels.into_iter().collect()))
    }
}
