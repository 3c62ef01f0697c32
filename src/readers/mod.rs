pub mod observation_reader;

pub use observation_reader::{
    parse_observation_line, parse_source_date, ObservationReader, ParseStats, ParsedSource,
};
