//! Prelude module for convenient imports
//!
//! Import everything you need with: `use geostream::prelude::*;`

// Domain types
pub use crate::domain::{
    BoundingBox, CanonicalRecord, Coordinates, DATASET_HEADER, DomainError, sanitize,
};

// Engine types
pub use crate::engine::{NormalizeError, RawPost, normalize};

// IO types
pub use crate::io::{
    CREDENTIALS_FILE, ConfigError, Credentials, FilterStreamClient, OAuthSigner,
    PARAMETERS_FILE, Parameters, StreamMessage, Upstream, UpstreamError,
};

// Storage types
pub use crate::storage::{AppendStore, EventLogger, EventSink, RecordSink, StorageError};

// Streaming types
pub use crate::streaming::{
    AbortOnError, ErrorPolicy, ReconnectConfig, SessionReport, SessionState, SkipErrors,
    StreamSession, Supervisor, SupervisorConfig,
};

// App types
pub use crate::app::{AppError, CliApp, init_tracing, install_dir};
