use log::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

mod carousel;
mod config;
mod contact;
mod counter;
mod dom;
mod listener;
mod nav;
mod panel;
mod scroll;
mod site;
mod tabs;
mod theme;
mod year;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting site interactions");
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if document.ready_state() == "loading" {
        let start = Closure::once_into_js(site::start);
        if let Err(err) =
            document.add_event_listener_with_callback("DOMContentLoaded", start.unchecked_ref())
        {
            warn!("Failed to register DOMContentLoaded listener: {:?}", err);
        }
    } else {
        site::start();
    }
}
