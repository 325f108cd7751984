use gif_layers::app::{GifLayers, WINDOW_SIZE};

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application("gif-layers", GifLayers::update, GifLayers::view)
        .subscription(GifLayers::subscription)
        .theme(GifLayers::theme)
        .window_size(WINDOW_SIZE)
        .centered()
        .run_with(GifLayers::new)
}
