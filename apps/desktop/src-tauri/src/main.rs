#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    sentinel_desktop_lib::run()
}
