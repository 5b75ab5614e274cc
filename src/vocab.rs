//! Static vocabulary: tag names, coded values and block labels.
//!
//! Used for presentation and for resolving type-3 (coded text) parameters.
//! Lookups never fail; misses come back as `Unresolved` so callers can flag them.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::format::{Tag, TypeKey};
use crate::params::CodedText;

/// Result of a vocabulary lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Lookup {
    Resolved(&'static str),
    Unresolved,
}

impl Lookup {
    #[must_use]
    pub fn resolved(self) -> Option<&'static str> {
        match self {
            Lookup::Resolved(s) => Some(s),
            Lookup::Unresolved => None,
        }
    }
}

/// Tag → human-readable parameter name. Sorted by tag.
pub const TAG_NAMES: &[(&str, &str)] = &[
    ("ABP", "Absolute Peak Pos in Laser*2"),
    ("ACC", "Accessory"),
    ("AG2", "Actual Signal Gain 2nd Channel"),
    ("AN1", "Analog Signal 1"),
    ("AN2", "Analog Signal 2"),
    ("APF", "Apodization Function"),
    ("APT", "Aperture Setting"),
    ("AQM", "Acquisition Mode"),
    ("ARG", "Actual Signal Gain"),
    ("ARS", "Number of Background Scans"),
    ("ASG", "Actual Ref. Signal Gain"),
    ("ASS", "Actual Signal Gain"),
    ("BBW", "Number of Bad BW Scans"),
    ("BFW", "Number of Bad FW Scans"),
    ("BLD", "Building"),
    ("BMS", "Beamsplitter Setting"),
    ("CHN", "Measurement Channel"),
    ("CNM", "Operator Name"),
    ("COR", "Correlation Test Mode"),
    ("CPY", "Company"),
    ("CSF", "Y - Scaling Factor"),
    ("DAQ", "Data Aquisition Status"),
    ("DAT", "Date of Measurement"),
    ("DEL", "Delay Before Measurement"),
    ("DLY", "Stabilization Delay"),
    ("DPF", "Data Point Format"),
    ("DPM", "Department"),
    ("DTC", "Detector Setting"),
    ("DUR", "Scan time (sec)"),
    ("DXU", "X Units"),
    ("EXP", "Experiment"),
    ("FOC", "Focal Length"),
    ("FXV", "Frequency of First Point"),
    ("GBW", "Number of Good BW Scans"),
    ("GFW", "Number of Good FW Scans"),
    ("HFL", "High Folding Limit"),
    ("HFQ", "End Frequency Limit for File"),
    ("HFW", "Wanted High Frequency Limit"),
    ("HPF", "High Pass Filter"),
    ("HUM", "Humidity Interferometer"),
    ("INS", "Instrument Type"),
    ("IST", "Instrument Status"),
    ("LCT", "Location"),
    ("LFL", "Low Folding Limit"),
    ("LFQ", "Start Frequency Limit for File"),
    ("LFW", "Wanted Low Frequency Limit"),
    ("LPF", "Low Pass Filter"),
    ("LWN", "Laser Wavenumber"),
    ("LXV", "Frequency of Last Point"),
    ("MNY", "Y - Minimum"),
    ("MVD", "Max. Velocity Deviation"),
    ("MXY", "Y - Maximum"),
    ("NLI", "Non Linearity Correction"),
    ("NPT", "Number of Data Points"),
    ("NSN", "Scan Number"),
    ("NSS", "Sample Scans"),
    ("OPF", "Optical Filter Setting"),
    ("P2A", "Peak Amplitude 2nd Channel"),
    ("P2K", "Backward Peak Location 2nd Channel"),
    ("P2L", "Peak Location 2nd Channel"),
    ("P2R", "Backward Peak Amplitude 2nd Channel"),
    ("PGN", "Preamplifier Gain"),
    ("PHR", "Phase Resolution"),
    ("PHZ", "Phase Correction Mode"),
    ("PKA", "Peak Amplitude"),
    ("PKL", "Peak Location"),
    ("PLF", "Result Spectrum"),
    ("PRA", "Backward Peak Amplitude"),
    ("PRL", "Backward Peak Location"),
    ("PRS", "Pressure Interferometer (hPa)"),
    ("RCH", "Background Measurement Channel"),
    ("RDX", "Extended Ready Check"),
    ("RDY", "Ready Check"),
    ("RES", "Resolution"),
    ("RG2", "Signal Gain, Background 2nd Channel"),
    ("RGN", "Signal Gain, Background"),
    ("RSN", "Running Sample Number"),
    ("SFM", "Sample Form"),
    ("SG2", "Signal Gain, Sample 2nd Channel"),
    ("SGN", "Signal Gain, Sample"),
    ("SNM", "Sample Name"),
    ("SON", "External Synchronisation"),
    ("SPZ", "Stored Phase Mode"),
    ("SRC", "Source Setting"),
    ("SRN", "Instrument Serial Number"),
    ("SRT", "Start time (sec)"),
    ("SSM", "Sample Spacing Multiplicator"),
    ("SSP", "Sample Spacing Divisor"),
    ("TDL", "To do list"),
    ("TIM", "Time of Measurement"),
    ("TPX", "Total Points X"),
    ("TSC", "Scanner Temperature"),
    ("VEL", "Scanner Velocity"),
    ("VSN", "Firmware version"),
    ("XPP", "Experiment Path"),
    ("ZFF", "Zero Filling Factor"),
];

/// Code → meaning for coded-text parameters.
pub const CODES: &[(&str, &str)] = &[
    ("B3", "Blackman-Harris 3-Term"),
    ("DD", "Double Sided,Forward-Backward"),
    ("ML", "Mertz"),
    ("NO", "No"),
    ("PNT", "Points"),
    ("RFL", "Reflectance"),
    ("WN", "Wavenumber cm-1"),
    ("-1", "Automatic"),
    ("0", "Open or OFF"),
    ("1", "ON"),
    ("2", "Open"),
    ("3", "3"),
    ("8", "8"),
    ("16", "16"),
    ("1.6", "1.60"),
    ("2.5", "2.50"),
    ("5.0", "5.00"),
];

/// (tag, code) → meaning; takes precedence over [`CODES`].
pub const TAG_CODES: &[(&str, &str, &str)] = &[("HPF", "0", "Open"), ("RDX", "0", "OFF")];

/// Block key → label.
pub const BLOCK_LABELS: &[(TypeKey, &str)] = &[
    (TypeKey::new(0, 0, 0, 0), "garbage blocs"),
    (TypeKey::new(0, 0, 104, 64), "Datafile History"),
    (TypeKey::new(7, 4, 0, 0), "ScSm"),
    (TypeKey::new(23, 4, 0, 0), "Data Parameters ScSm"),
    (TypeKey::new(7, 8, 0, 0), "IgSm"),
    (TypeKey::new(23, 8, 0, 0), "Data Parameters IgSm"),
    (TypeKey::new(7, 12, 0, 0), "PhSm"),
    (TypeKey::new(23, 12, 0, 0), "Data Parameters PhSm"),
    (TypeKey::new(32, 0, 0, 0), "Instrument Parameters"),
    (TypeKey::new(40, 0, 0, 0), "Instrument Parameters Rf"),
    (TypeKey::new(48, 0, 0, 0), "Acquisition Parameters"),
    (TypeKey::new(64, 0, 0, 0), "FT - Parameters"),
    (TypeKey::new(96, 0, 0, 0), "Optics Parameters"),
    (TypeKey::new(104, 0, 0, 0), "Optics Parameters Rf"),
    (TypeKey::new(160, 0, 0, 0), "Sample Parameters"),
];

/// Human-readable name of a parameter tag.
#[must_use]
pub fn tag_name(tag: &Tag) -> Lookup {
    let key = tag.as_bytes();
    TAG_NAMES
        .binary_search_by(|(t, _)| t.as_bytes().cmp(key))
        .map_or(Lookup::Unresolved, |i| Lookup::Resolved(TAG_NAMES[i].1))
}

/// Resolve a coded-text value: tag-specific table first, then the general one.
#[must_use]
pub fn code_text(tag: &Tag, code: &str) -> CodedText {
    let tag_bytes = tag.as_bytes();
    let specific = TAG_CODES
        .iter()
        .find(|(t, c, _)| t.as_bytes() == tag_bytes && *c == code)
        .map(|(_, _, text)| *text);
    let general = || CODES.iter().find(|(c, _)| *c == code).map(|(_, text)| *text);

    match specific.or_else(general) {
        Some(text) => CodedText::Resolved {
            code: code.to_string(),
            text,
        },
        None => CodedText::Unresolved(code.to_string()),
    }
}

/// Label of a known block key.
#[must_use]
pub fn block_label(key: TypeKey) -> Option<&'static str> {
    BLOCK_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

/// Width of the longest tag name, for aligned output.
#[must_use]
pub fn name_width() -> usize {
    TAG_NAMES.iter().map(|(_, n)| n.len()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_sorted_for_binary_search() {
        assert!(TAG_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn tag_specific_code_wins() {
        let hpf = code_text(&Tag::new("HPF"), "0");
        assert_eq!(hpf.text(), Some("Open"));
        let other = code_text(&Tag::new("APT"), "0");
        assert_eq!(other.text(), Some("Open or OFF"));
    }

    #[test]
    fn unknown_code_is_unresolved() {
        let v = code_text(&Tag::new("APF"), "ZZ");
        assert_eq!(v, CodedText::Unresolved("ZZ".to_string()));
    }

    #[test]
    fn labels_and_names() {
        assert_eq!(block_label(TypeKey::new(160, 0, 0, 0)), Some("Sample Parameters"));
        assert_eq!(block_label(TypeKey::new(1, 2, 3, 4)), None);
        assert_eq!(tag_name(&Tag::new("SNM")), Lookup::Resolved("Sample Name"));
        assert_eq!(tag_name(&Tag::new("QQQ")), Lookup::Unresolved);
        assert_eq!(name_width(), "Backward Peak Amplitude 2nd Channel".len());
    }
}
