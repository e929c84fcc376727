//! Error types for catscat.

/// Result type alias for catscat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for catscat.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Stage source folder does not exist.
    #[error("source folder does not exist: {path}")]
    SourceFolderNotFound {
        /// Path to the missing folder.
        path: std::path::PathBuf,
    },

    /// Failed to open audio file.
    #[error("failed to open audio file '{path}'")]
    AudioOpen {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to decode audio.
    #[error("failed to decode audio from '{path}'")]
    AudioDecode {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No audio tracks found.
    #[error("no audio tracks found in '{path}'")]
    NoAudioTracks {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// Decoded audio contained no samples.
    #[error("audio file '{path}' contains no samples")]
    EmptyAudio {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// Failed to resample audio.
    #[error("failed to resample audio: {reason}")]
    Resample {
        /// Description of the resampling failure.
        reason: String,
    },

    /// Failed to write WAV file.
    #[error("failed to write WAV file '{path}'")]
    WavWriteFailed {
        /// Path to the WAV file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: hound::Error,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy a file into the collected data tree.
    #[error("failed to copy '{from}' to '{to}'")]
    CopyFailed {
        /// Source path.
        from: std::path::PathBuf,
        /// Destination path.
        to: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File name does not follow the `{category}_{index}_{source}` convention.
    #[error("invalid clip file name '{name}': {reason}")]
    InvalidClipName {
        /// Offending file name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Pipeline stages are not ordered so that every input is produced first.
    #[error("stage '{stage}' needs {needs} artifacts, which are only produced later by '{producer}'")]
    PipelineOrder {
        /// Stage with the unmet requirement.
        stage: String,
        /// Required artifact kind.
        needs: String,
        /// Later stage producing it.
        producer: String,
    },

    /// Stage input is neither produced by an earlier stage nor present on disk.
    #[error("stage '{stage}' needs {needs} artifacts at '{path}', but the folder does not exist")]
    MissingStageInput {
        /// Stage with the unmet requirement.
        stage: String,
        /// Required artifact kind.
        needs: String,
        /// Folder that was expected to hold them.
        path: std::path::PathBuf,
    },

    /// Stage listed more than once in a pipeline.
    #[error("stage '{stage}' appears more than once in the pipeline")]
    DuplicateStage {
        /// The repeated stage.
        stage: String,
    },

    /// Pipeline contains no stages.
    #[error("pipeline contains no stages")]
    EmptyPipeline,

    /// Failed to write a run manifest.
    #[error("failed to write manifest '{path}'")]
    ManifestWrite {
        /// Path to the manifest file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}
