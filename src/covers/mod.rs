pub mod import;
pub mod resize;

pub use import::{process_card_cover, CARD_HEIGHT, CARD_WIDTH, STAGED_COVER};
pub use resize::{
    resize_cover, responsive_covers, smart_resize_cover, CoverError, ResizeOptions,
};
