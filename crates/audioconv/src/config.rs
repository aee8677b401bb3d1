use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything one conversion run needs, fully validated up front. The
/// pipeline itself never parses or prompts.
pub(crate) struct Config {
    pub(crate) mode: Mode,
    pub(crate) source: PathBuf,
    pub(crate) dest: PathBuf,
    pub(crate) format: OutputFormat,
    pub(crate) quality: Quality,
    pub(crate) bitrate: Option<Bitrate>,
    pub(crate) sample_rate: Option<SampleRate>,
    pub(crate) overwrite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Single,
    Folder,
}

/// Why a raw input value was rejected. The messages double as the retry
/// hints shown by the interactive prompts.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ValidateError {
    #[error("please enter a path")]
    EmptyPath,
    #[error("path '{0}' does not exist")]
    Missing(PathBuf),
    #[error("'{0}' is not a file")]
    NotAFile(PathBuf),
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),
    #[error("cannot use '{0}': {1}")]
    Unusable(PathBuf, String),
    #[error("'{0}' is not a supported audio format")]
    UnknownFormat(String),
    #[error("please enter a number between 0 and 9")]
    BadQuality,
    #[error("please enter a valid bitrate (e.g. 192k) or leave blank")]
    BadBitrate,
    #[error("please enter a valid sample rate (e.g. 44100) or leave blank")]
    BadSampleRate,
    #[error("please enter 'y' or 'n'")]
    BadAnswer,
    #[error("please enter {0}")]
    BadChoice(&'static str),
}

/// An output format ffmpeg can encode to. Custom format input is validated
/// against the same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Mp3,
    Wav,
    Flac,
    Aac,
    Ogg,
    M4a,
}

impl OutputFormat {
    pub(crate) const ALL: [OutputFormat; 6] = [
        OutputFormat::Mp3,
        OutputFormat::Wav,
        OutputFormat::Flac,
        OutputFormat::Aac,
        OutputFormat::Ogg,
        OutputFormat::M4a,
    ];

    /// Lower-cased extension without the dot.
    pub(crate) fn ext(self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
            OutputFormat::Flac => "flac",
            OutputFormat::Aac => "aac",
            OutputFormat::Ogg => "ogg",
            OutputFormat::M4a => "m4a",
        }
    }

    /// The ffmpeg quality knob this format understands, if any. Lossy
    /// formats take `-q:a`, flac takes `-compression_level`, both on the
    /// same 0-9 scale.
    pub(crate) fn quality_arg(self) -> Option<&'static str> {
        match self {
            OutputFormat::Mp3 | OutputFormat::Aac | OutputFormat::M4a => Some("-q:a"),
            OutputFormat::Flac => Some("-compression_level"),
            OutputFormat::Wav | OutputFormat::Ogg => None,
        }
    }
}

pub(crate) fn parse_format(input: &str) -> Result<OutputFormat, ValidateError> {
    let trimmed = input.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
    let lower = bare.to_ascii_lowercase();

    OutputFormat::ALL
        .into_iter()
        .find(|format| format.ext() == lower)
        .ok_or_else(|| ValidateError::UnknownFormat(bare.to_string()))
}

/// Quality on the shared 0-9 scale, 0 being highest quality (or least
/// compression for flac).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Quality(u8);

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub(crate) fn quality_from(value: u8) -> Result<Quality, ValidateError> {
    if value <= 9 {
        Ok(Quality(value))
    } else {
        Err(ValidateError::BadQuality)
    }
}

pub(crate) fn parse_quality(input: &str) -> Result<Quality, ValidateError> {
    let value: u8 = input.trim().parse().map_err(|_| ValidateError::BadQuality)?;
    quality_from(value)
}

/// A bitrate in the `<int>k` form ffmpeg expects, e.g. `192k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Bitrate(String);

impl Bitrate {
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Empty input means "use the encoder default".
pub(crate) fn parse_bitrate(input: &str) -> Result<Option<Bitrate>, ValidateError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    let Some(digits) = trimmed.strip_suffix(['k', 'K']) else {
        return Err(ValidateError::BadBitrate);
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidateError::BadBitrate);
    }

    Ok(Some(Bitrate(format!("{digits}k"))))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SampleRate(u32);

impl SampleRate {
    pub(crate) fn new(hz: u32) -> Self {
        Self(hz)
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Empty input means "use the source rate".
pub(crate) fn parse_sample_rate(input: &str) -> Result<Option<SampleRate>, ValidateError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse()
        .map(|hz| Some(SampleRate(hz)))
        .map_err(|_| ValidateError::BadSampleRate)
}

pub(crate) fn parse_yes_no(input: &str) -> Result<bool, ValidateError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Err(ValidateError::BadAnswer),
    }
}

/// Normalize and check the source path against the selected mode.
pub(crate) fn check_source(path: &Path, mode: Mode) -> Result<PathBuf, ValidateError> {
    if path.as_os_str().is_empty() {
        return Err(ValidateError::EmptyPath);
    }

    let path = fs::canonicalize(path).map_err(|_| ValidateError::Missing(path.to_path_buf()))?;

    match mode {
        Mode::Single if !path.is_file() => Err(ValidateError::NotAFile(path)),
        Mode::Folder if !path.is_dir() => Err(ValidateError::NotADirectory(path)),
        _ => Ok(path),
    }
}

/// Normalize the destination directory, creating it (and parents) as needed.
pub(crate) fn check_dest(path: &Path) -> Result<PathBuf, ValidateError> {
    if path.as_os_str().is_empty() {
        return Err(ValidateError::EmptyPath);
    }

    fs::create_dir_all(path)
        .map_err(|e| ValidateError::Unusable(path.to_path_buf(), e.to_string()))?;
    fs::canonicalize(path).map_err(|e| ValidateError::Unusable(path.to_path_buf(), e.to_string()))
}

/// The destination offered when none was given: the file's own directory in
/// single mode, the source folder itself in folder mode.
pub(crate) fn default_dest(source: &Path, mode: Mode) -> PathBuf {
    match mode {
        Mode::Single => source.parent().unwrap_or(source).to_path_buf(),
        Mode::Folder => source.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing() {
        assert_eq!(parse_format("mp3"), Ok(OutputFormat::Mp3));
        assert_eq!(parse_format(".FLAC"), Ok(OutputFormat::Flac));
        assert_eq!(parse_format(" ogg "), Ok(OutputFormat::Ogg));
        assert_eq!(
            parse_format("mp4"),
            Err(ValidateError::UnknownFormat("mp4".to_string()))
        );
        assert_eq!(
            parse_format(""),
            Err(ValidateError::UnknownFormat(String::new()))
        );
    }

    #[test]
    fn quality_range() {
        assert_eq!(parse_quality("0"), Ok(Quality(0)));
        assert_eq!(parse_quality(" 9 "), Ok(Quality(9)));
        assert_eq!(parse_quality("10"), Err(ValidateError::BadQuality));
        assert_eq!(parse_quality("-1"), Err(ValidateError::BadQuality));
        assert_eq!(parse_quality("high"), Err(ValidateError::BadQuality));
    }

    #[test]
    fn quality_knob_per_format() {
        assert_eq!(OutputFormat::Mp3.quality_arg(), Some("-q:a"));
        assert_eq!(OutputFormat::Aac.quality_arg(), Some("-q:a"));
        assert_eq!(OutputFormat::M4a.quality_arg(), Some("-q:a"));
        assert_eq!(OutputFormat::Flac.quality_arg(), Some("-compression_level"));
        assert_eq!(OutputFormat::Wav.quality_arg(), None);
        assert_eq!(OutputFormat::Ogg.quality_arg(), None);
    }

    #[test]
    fn bitrate_forms() {
        assert_eq!(parse_bitrate(""), Ok(None));
        assert_eq!(
            parse_bitrate("192k").unwrap().unwrap().as_str(),
            "192k"
        );
        assert_eq!(parse_bitrate("320K").unwrap().unwrap().as_str(), "320k");
        assert_eq!(parse_bitrate("192"), Err(ValidateError::BadBitrate));
        assert_eq!(parse_bitrate("k"), Err(ValidateError::BadBitrate));
        assert_eq!(parse_bitrate("19a2k"), Err(ValidateError::BadBitrate));
    }

    #[test]
    fn sample_rate_forms() {
        assert_eq!(parse_sample_rate(""), Ok(None));
        assert_eq!(parse_sample_rate("44100"), Ok(Some(SampleRate(44100))));
        assert_eq!(
            parse_sample_rate("44.1k"),
            Err(ValidateError::BadSampleRate)
        );
    }

    #[test]
    fn yes_no_forms() {
        assert_eq!(parse_yes_no("y"), Ok(true));
        assert_eq!(parse_yes_no("YES"), Ok(true));
        assert_eq!(parse_yes_no("n"), Ok(false));
        assert_eq!(parse_yes_no("No "), Ok(false));
        assert_eq!(parse_yes_no("maybe"), Err(ValidateError::BadAnswer));
    }

    #[test]
    fn source_checks_mode() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("song.mp3");
        std::fs::write(&file, b"data").unwrap();

        assert!(check_source(&file, Mode::Single).is_ok());
        assert!(check_source(dir.path(), Mode::Folder).is_ok());

        assert!(matches!(
            check_source(&file, Mode::Folder),
            Err(ValidateError::NotADirectory(..))
        ));
        assert!(matches!(
            check_source(dir.path(), Mode::Single),
            Err(ValidateError::NotAFile(..))
        ));
        assert!(matches!(
            check_source(&dir.path().join("missing"), Mode::Single),
            Err(ValidateError::Missing(..))
        ));
    }

    #[test]
    fn dest_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a").join("b");

        let checked = check_dest(&dest).unwrap();
        assert!(checked.is_dir());
    }
}
