use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use std::{env, path::Path, process, thread};

use rondo::{Event, ImportResult, PlaybackState, Player, Settings};

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(cmd) = args.next() else {
        usage();
    };

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("config error: {err}");
            process::exit(1);
        }
    };
    if let Err(err) = settings.validate() {
        eprintln!("config error: {err}");
        process::exit(1);
    }

    let player = match Player::new(settings) {
        Ok(player) => player,
        Err(err) => {
            eprintln!("startup error: {err}");
            process::exit(1);
        }
    };

    match cmd.as_str() {
        "import" => {
            let paths: Vec<String> = args.collect();
            if paths.is_empty() {
                usage();
            }
            for path in paths {
                report(&player.import_file(Path::new(&path)));
            }
        }
        "import-dir" => {
            let Some(dir) = args.next() else {
                usage();
            };
            for result in player.import_directory(Path::new(&dir)) {
                report(&result);
            }
        }
        "list" => {
            for name in player.list_catalog() {
                println!("{name}");
            }
        }
        "delete-all" => {
            if let Err(err) = player.delete_all() {
                eprintln!("delete-all failed: {err}");
                process::exit(1);
            }
        }
        "play" => {
            let Some(name) = args.next() else {
                usage();
            };
            let failed = Arc::new(AtomicBool::new(false));
            let failed_in_cb = failed.clone();
            player.subscribe(move |event| {
                if let Event::PlaybackError { message } = event {
                    eprintln!("playback error: {message}");
                    failed_in_cb.store(true, Ordering::SeqCst);
                }
            });

            if let Err(err) = player.load(&name).and_then(|()| player.play()) {
                eprintln!("playback failed: {err}");
                process::exit(1);
            }

            // Block until the track finishes (or errors out).
            loop {
                if failed.load(Ordering::SeqCst) {
                    process::exit(1);
                }
                if player.state() == PlaybackState::Idle {
                    break;
                }
                thread::sleep(Duration::from_millis(200));
            }
        }
        _ => usage(),
    }
}

fn report(result: &ImportResult) {
    match result {
        ImportResult::Imported(name) => println!("imported {name}"),
        ImportResult::Skipped(name, _) => println!("skipped {name} (already in catalog)"),
        ImportResult::Failed(path, err) => eprintln!("failed {}: {err}", path.display()),
    }
}

fn usage() -> ! {
    eprintln!(
        "usage: rondo <command>\n\
         \n\
         commands:\n\
         \x20 import <file>...     convert files into the library\n\
         \x20 import-dir <dir>     convert every file under a directory\n\
         \x20 list                 print the catalog\n\
         \x20 play <name>          play a catalog entry to the end\n\
         \x20 delete-all           clear the catalog and remove all tracks"
    );
    process::exit(2);
}
