pub mod observation;
pub mod station;
pub mod yearly_stat;

pub use observation::{ObservationLine, ObservationView, RawObservation};
pub use station::Station;
pub use yearly_stat::{YearlyStat, YearlyStatView};
