use avl_map::avl_tree::AvlMap;
use log::{error, info, LevelFilter};
use simplelog::{Config, SimpleLogger};
use std::env;

fn main() {
    let level = match env::args().nth(1).as_ref().map(String::as_str) {
        Some("-v") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    SimpleLogger::init(level, Config::default()).expect("Error: logger already initialized.");

    let mut map = AvlMap::new();
    for key in &[1, 3, 5, 10, 6, 11, 8, 4, 7] {
        map.insert(*key, *key);
    }
    info!("inserted {} keys, height {}", map.len(), map.height());
    print!("{}", map.render());

    map.remove(&6);
    info!("removed 6, height {}", map.height());
    print!("{}", map.render());

    if let Err(err) = map.validate() {
        error!("{}", err);
    }
}
