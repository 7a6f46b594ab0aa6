// ============================================================================
// mediasleuth-core/src/record.rs
// ============================================================================
//
// INSPECTION RECORD: The Property Set of One File
//
// A record holds every property slot of one inspected file, grouped as
// basic (read from the container), estimated (derived by analysis) and
// criteria (pass/fail checks). It is created when a file is accepted,
// mutated only by that file's stages, and replaced wholesale on refresh:
// a refresh gets a new `InspectionId` so late results of the old run can be
// told apart.
//
// AI-ASSISTANT-INFO: Per-file property set and its display row

// ---- External crate imports ----
use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

// ---- Standard library imports ----
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ---- Internal crate imports ----
use crate::properties::{LOADING, Property, PropertyKind, PropertyValue};
use crate::utils::file_name_parts;

/// Identity of one inspection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InspectionId(Uuid);

impl InspectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InspectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InspectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyGroup {
    Basic,
    Estimated,
    Criteria,
}

macro_rules! property_keys {
    ($($variant:ident => $name:literal, $group:ident, $kind:ident;)*) => {
        /// Every property a record carries.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum PropertyKey {
            $($variant,)*
        }

        impl PropertyKey {
            pub const ALL: &'static [PropertyKey] = &[$(PropertyKey::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(PropertyKey::$variant => $name,)*
                }
            }

            pub fn group(self) -> PropertyGroup {
                match self {
                    $(PropertyKey::$variant => PropertyGroup::$group,)*
                }
            }

            pub fn kind(self) -> PropertyKind {
                match self {
                    $(PropertyKey::$variant => PropertyKind::$kind,)*
                }
            }
        }
    };
}

property_keys! {
    Path => "path", Basic, Plain;
    Name => "name", Basic, Plain;
    FromFolder => "from_folder", Basic, Plain;
    Extension => "extension", Basic, Plain;
    TimecodeStart => "timecode_start", Basic, Timecode;
    FullDuration => "full_duration", Basic, Duration;
    Framecount => "framecount", Basic, Plain;
    Fps => "fps", Basic, Plain;
    Resolution => "resolution", Basic, Plain;
    AspectRatio => "aspect_ratio", Basic, Plain;
    AudioPeak => "audio_peak", Basic, Plain;
    VideoBitrate => "video_bitrate", Basic, Plain;
    VideoCodec => "video_codec", Basic, Plain;
    AudioCodec => "audio_codec", Basic, Plain;
    AudioBitrate => "audio_bitrate", Basic, Plain;
    AudioSampleRate => "audio_sample_rate", Basic, Plain;
    ContentStartTimecode => "content_start_timecode", Estimated, Timecode;
    ContentStartFrame => "content_start_frame", Estimated, Plain;
    ContentEndFrame => "content_end_frame", Estimated, Plain;
    ContentDuration => "content_duration", Estimated, Duration;
    BlackAtTail => "black_at_tail", Estimated, Duration;
    SlateAgency => "slate_agency", Estimated, Plain;
    SlateAspect => "slate_aspect", Estimated, Plain;
    SlateClient => "slate_client", Estimated, Plain;
    SlateDate => "slate_date", Estimated, Plain;
    SlateDirector => "slate_director", Estimated, Plain;
    SlateDuration => "slate_duration", Estimated, Plain;
    SlateKeyNumber => "slate_key_number", Estimated, Plain;
    SlateProduct => "slate_product", Estimated, Plain;
    SlateProductionco => "slate_productionco", Estimated, Plain;
    SlateTitle => "slate_title", Estimated, Plain;
    ContentAspectRatio => "content_aspect_ratio", Estimated, NotImplemented;
    BlankingSummary => "blanking_summary", Estimated, NotImplemented;
    HasDuplicateFrames => "has_duplicate_frames", Estimated, NotImplemented;
    Slate => "slate", Criteria, Plain;
    Op48Audio => "op48_audio", Criteria, Condition;
    Op59Audio => "op59_audio", Criteria, Condition;
}

impl PropertyKey {
    /// Slate property fed by an OCR key, if the key is known.
    pub fn for_slate_key(key: &str) -> Option<PropertyKey> {
        Some(match key.trim().to_ascii_lowercase().as_str() {
            "key" => PropertyKey::SlateKeyNumber,
            "date" => PropertyKey::SlateDate,
            "duration" => PropertyKey::SlateDuration,
            "aspect" => PropertyKey::SlateAspect,
            "agency" => PropertyKey::SlateAgency,
            "client" => PropertyKey::SlateClient,
            "director" => PropertyKey::SlateDirector,
            "product" => PropertyKey::SlateProduct,
            "productionco" => PropertyKey::SlateProductionco,
            "title" => PropertyKey::SlateTitle,
            _ => return None,
        })
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column headers of a display row, in order.
pub const COLUMNS: [&str; 25] = [
    "path",
    "folder",
    "filename",
    "timecode_start",
    "content_start_timecode",
    "framecount",
    "full_duration",
    "content_duration",
    "slate",
    "black_at_tail",
    "slate_key_number",
    "op48_audio",
    "op59_audio",
    "audio_peak",
    "resolution",
    "aspect_ratio",
    "fps",
    "video_bitrate",
    "video_codec",
    "audio_codec",
    "audio_bitrate",
    "audio_sample_rate",
    "slate_date",
    "slate_aspect",
    "slate_duration",
];

/// Properties behind the columns after path, folder and filename.
const ROW_KEYS: [PropertyKey; 22] = [
    PropertyKey::TimecodeStart,
    PropertyKey::ContentStartTimecode,
    PropertyKey::Framecount,
    PropertyKey::FullDuration,
    PropertyKey::ContentDuration,
    PropertyKey::Slate,
    PropertyKey::BlackAtTail,
    PropertyKey::SlateKeyNumber,
    PropertyKey::Op48Audio,
    PropertyKey::Op59Audio,
    PropertyKey::AudioPeak,
    PropertyKey::Resolution,
    PropertyKey::AspectRatio,
    PropertyKey::Fps,
    PropertyKey::VideoBitrate,
    PropertyKey::VideoCodec,
    PropertyKey::AudioCodec,
    PropertyKey::AudioBitrate,
    PropertyKey::AudioSampleRate,
    PropertyKey::SlateDate,
    PropertyKey::SlateAspect,
    PropertyKey::SlateDuration,
];

/// One rendered table row, cells in [`COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub cells: Vec<String>,
}

impl DisplayRow {
    /// Cell under the named column.
    pub fn get(&self, column: &str) -> Option<&str> {
        let index = COLUMNS.iter().position(|c| *c == column)?;
        self.cells.get(index).map(String::as_str)
    }
}

/// All properties of one inspected file.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionRecord {
    id: InspectionId,
    path: PathBuf,
    file_name: String,
    created_at: DateTime<Local>,
    properties: BTreeMap<PropertyKey, Property>,
}

impl InspectionRecord {
    /// New record with the path-derived properties set and the rest unset.
    pub fn new(path: &Path) -> Self {
        let mut properties: BTreeMap<PropertyKey, Property> = PropertyKey::ALL
            .iter()
            .map(|key| (*key, Property::new(key.kind())))
            .collect();

        let parts = file_name_parts(path);
        let mut set = |key: PropertyKey, value: String| {
            if let Some(p) = properties.get_mut(&key) {
                p.set(value);
            }
        };
        set(PropertyKey::Path, path.to_string_lossy().into_owned());
        set(PropertyKey::Name, parts.name);
        set(PropertyKey::FromFolder, parts.from_folder);
        set(PropertyKey::Extension, parts.extension);

        Self {
            id: InspectionId::new(),
            path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            created_at: Local::now(),
            properties,
        }
    }

    /// A fresh record for the same file with a new identity.
    pub fn refreshed(&self) -> Self {
        Self::new(&self.path)
    }

    pub fn id(&self) -> InspectionId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn extension(&self) -> &str {
        match self.value(PropertyKey::Extension) {
            Some(PropertyValue::Text(ext)) => ext,
            _ => "",
        }
    }

    pub fn property(&self, key: PropertyKey) -> Option<&Property> {
        self.properties.get(&key)
    }

    pub fn value(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.properties.get(&key).and_then(Property::value)
    }

    pub fn set(&mut self, key: PropertyKey, value: impl Into<PropertyValue>) {
        if let Some(p) = self.properties.get_mut(&key) {
            p.set(value);
        }
    }

    pub fn set_option<V: Into<PropertyValue>>(&mut self, key: PropertyKey, value: Option<V>) {
        if let Some(p) = self.properties.get_mut(&key) {
            p.set_option(value);
        }
    }

    pub fn set_null(&mut self, keys: &[PropertyKey]) {
        for key in keys {
            if let Some(p) = self.properties.get_mut(key) {
                p.set_null();
            }
        }
    }

    pub fn display(&self, key: PropertyKey) -> String {
        self.properties
            .get(&key)
            .map(Property::display)
            .unwrap_or_else(|| LOADING.to_string())
    }

    /// Properties of one group, in key order.
    pub fn group(&self, group: PropertyGroup) -> impl Iterator<Item = (PropertyKey, &Property)> {
        self.properties
            .iter()
            .filter(move |(key, _)| key.group() == group)
            .map(|(key, p)| (*key, p))
    }

    fn leading_cells(&self) -> Vec<String> {
        vec![
            self.path.to_string_lossy().into_owned(),
            self.display(PropertyKey::FromFolder),
            self.file_name.clone(),
        ]
    }

    /// Current row snapshot.
    pub fn display_row(&self) -> DisplayRow {
        let mut cells = self.leading_cells();
        cells.extend(ROW_KEYS.iter().map(|key| self.display(*key)));
        DisplayRow { cells }
    }

    /// Row shown before any stage has run.
    pub fn placeholder_row(&self) -> DisplayRow {
        let mut cells = self.leading_cells();
        cells.resize(COLUMNS.len(), LOADING.to_string());
        DisplayRow { cells }
    }
}
