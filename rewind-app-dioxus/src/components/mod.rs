mod backdrop;
mod collage;
mod mute_button;
mod progress;
mod proposal;
mod slides;

pub use backdrop::Backdrop;
pub use collage::CollageSlide;
pub use mute_button::MuteButton;
pub use progress::ProgressBars;
pub use proposal::ProposalSlide;
pub use slides::SlideView;
