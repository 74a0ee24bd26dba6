mod album;
mod ids;
mod release;
mod track;

pub use album::{Album, CreateAlbum, UpdateAlbum};
pub use ids::{AlbumId, TrackId};
pub use release::{is_released, SweepReport};
pub use track::{CreateTrack, Track, UpdateTrack};
