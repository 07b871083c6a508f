use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use dreamfall::core::ecs::{load_level_library_from, load_narrative_library_from};
use dreamfall::save::SaveDb;
use dreamfall::simulation::powers::DreamPowerKind;
use dreamfall::ui::{render_ending, render_feed, render_level_select, render_status};
use dreamfall::{ActionIntent, Game};

struct Options {
    db_path: PathBuf,
    data_dir: PathBuf,
    ephemeral: bool,
}

fn parse_args(args: Vec<String>) -> Options {
    let mut options = Options {
        db_path: PathBuf::from("./dreamfall_save.db"),
        data_dir: PathBuf::from("./assets/data"),
        ephemeral: false,
    };
    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" => {
                if let Some(path) = iter.next() {
                    options.db_path = PathBuf::from(path);
                }
            }
            "--data" => {
                if let Some(dir) = iter.next() {
                    options.data_dir = PathBuf::from(dir);
                }
            }
            "--ephemeral" => options.ephemeral = true,
            other => eprintln!("Ignoring unknown argument {}", other),
        }
    }
    options
}

fn main() {
    env_logger::init();
    println!("Dreamfall progression core (debug console)");
    let options = parse_args(env::args().collect());

    let levels_path = options.data_dir.join("levels.json");
    let choices_path = options.data_dir.join("choices.json");
    let levels = load_level_library_from(&levels_path.display().to_string());
    let scripts = load_narrative_library_from(&choices_path.display().to_string());
    if levels.is_empty() {
        eprintln!(
            "No levels found under {}. Use --data <dir> to point at the asset directory.",
            options.data_dir.display()
        );
    }

    let mut game = Game::with_content(levels, scripts);

    let store = if options.ephemeral {
        SaveDb::open_in_memory()
    } else {
        SaveDb::open(&options.db_path)
    };
    match store {
        Ok(db) => game.attach_store(Box::new(db)),
        Err(err) => eprintln!("Running without save data: {}", err),
    }

    println!("Type 'help' for commands.");
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if stdin.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((command, rest)) = parts.split_first() else {
            continue;
        };

        match *command {
            "help" => print_help(),
            "quit" | "exit" => break,
            "status" => {
                let snapshot = game.tick(vec![ActionIntent::Wait]);
                print!("{}", render_status(&snapshot));
            }
            "levels" => {
                let state = game.save_state();
                print!(
                    "{}",
                    render_level_select(&game.level_library(), &state.progress)
                );
            }
            "ending" => {
                let state = game.save_state();
                print!("{}", render_ending(&state.narrative));
            }
            "script" => print_script(&game),
            "start" => match rest.first().and_then(|raw| raw.parse::<u32>().ok()) {
                Some(index) => run(&mut game, vec![ActionIntent::StartLevel { index }]),
                None => println!("Usage: start <level-index>"),
            },
            "solve" => match rest.first() {
                Some(id) => run(
                    &mut game,
                    vec![ActionIntent::PuzzleSolved {
                        puzzle_id: id.to_string(),
                    }],
                ),
                None => println!("Usage: solve <puzzle-id>"),
            },
            "choose" => match rest.first() {
                Some(id) => run(
                    &mut game,
                    vec![ActionIntent::Choose {
                        choice_id: id.to_string(),
                    }],
                ),
                None => println!("Usage: choose <choice-id>"),
            },
            "power" => match rest.first().and_then(|raw| parse_power(raw)) {
                Some(kind) => run(&mut game, vec![ActionIntent::ActivatePower { kind }]),
                None => println!("Usage: power <resize|gravity|time>"),
            },
            "scene" => match rest.first() {
                Some(name) => run(
                    &mut game,
                    vec![ActionIntent::SceneLoaded {
                        scene: name.to_string(),
                    }],
                ),
                None => println!("Usage: scene <scene-name>"),
            },
            "wait" => {
                let secs = rest
                    .first()
                    .and_then(|raw| raw.parse::<f32>().ok())
                    .unwrap_or(1.0);
                let snapshot = game.tick_with_dt(vec![ActionIntent::Wait], secs);
                print!("{}", render_feed(&snapshot));
            }
            "complete" => run(&mut game, vec![ActionIntent::CompleteLevel]),
            "fail" => run(&mut game, vec![ActionIntent::FailLevel]),
            "pause" => run(&mut game, vec![ActionIntent::Pause]),
            "resume" => run(&mut game, vec![ActionIntent::Resume]),
            "menu" => run(&mut game, vec![ActionIntent::ReturnToMenu]),
            "volume" => match (rest.first(), rest.get(1).and_then(|raw| raw.parse::<f32>().ok())) {
                (Some(&"music"), Some(level)) => {
                    run(&mut game, vec![ActionIntent::SetMusicVolume(level)])
                }
                (Some(&"effects"), Some(level)) => {
                    run(&mut game, vec![ActionIntent::SetEffectsVolume(level)])
                }
                _ => println!("Usage: volume <music|effects> <0.0-1.0>"),
            },
            "vibration" => match rest.first() {
                Some(&"on") => run(&mut game, vec![ActionIntent::SetVibration(true)]),
                Some(&"off") => run(&mut game, vec![ActionIntent::SetVibration(false)]),
                _ => println!("Usage: vibration <on|off>"),
            },
            other => println!("Unknown command {}. Type 'help'.", other),
        }
    }
    println!("Goodbye.");
}

fn run(game: &mut Game, intents: Vec<ActionIntent>) {
    let snapshot = game.tick(intents);
    print!("{}", render_feed(&snapshot));
}

fn parse_power(raw: &str) -> Option<DreamPowerKind> {
    match raw {
        "resize" => Some(DreamPowerKind::Resize),
        "gravity" => Some(DreamPowerKind::Gravity),
        "time" => Some(DreamPowerKind::Time),
        _ => None,
    }
}

fn print_script(game: &Game) {
    let state = game.save_state();
    let library = game.level_library();
    let Some(level) = library.get(state.progress.current_level) else {
        println!("No current level.");
        return;
    };
    let scripts = game.narrative_library();
    let Some(script) = scripts.script_for(&level.id) else {
        println!("No script authored for {}.", level.id);
        return;
    };
    for line in &script.lines {
        println!("{}: {}", line.speaker, line.text);
    }
    for choice in &script.choices {
        let taken = if state.narrative.resolved.contains(&choice.id) {
            " (taken)"
        } else {
            ""
        };
        println!("  [{}] {}{}", choice.id, choice.prompt, taken);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  levels                 list levels with lock state and best stars");
    println!("  start <index>          load a level by index");
    println!("  solve <puzzle-id>      signal a solved puzzle sub-state");
    println!("  complete | fail        signal the end of the current attempt");
    println!("  choose <choice-id>     pick a narrative choice");
    println!("  script                 show the current level's dialogue and choices");
    println!("  power <kind>           activate a dream power (resize|gravity|time)");
    println!("  scene <name>           report a scene as loaded");
    println!("  wait [secs]            advance the clock (default 1s)");
    println!("  pause | resume | menu  phase transitions");
    println!("  volume <ch> <v>        set music/effects volume");
    println!("  vibration <on|off>     toggle vibration");
    println!("  status | ending        show game state / narrative ending");
    println!("  quit                   leave");
}
