use chrono::Utc;

use recap::{engine, store, web};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: recap <command> [args...]");
        eprintln!("Commands:");
        eprintln!("  serve <data.json> [-p PORT]   Start the revision API (default port 3000)");
        eprintln!("  stats <data.json> <user-id>   Print a user's dashboard numbers");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "serve" => {
            if args.len() < 3 {
                eprintln!("Usage: recap serve <data.json> [-p PORT]");
                std::process::exit(1);
            }
            let (data_path, port) = parse_serve_args(&args[2..]);
            init_logging();
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(web::serve(data_path, port));
        }
        "stats" => {
            if args.len() < 4 {
                eprintln!("Usage: recap stats <data.json> <user-id>");
                std::process::exit(1);
            }
            stats(&args[2], &args[3]);
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            eprintln!("Commands: serve, stats");
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn parse_serve_args(args: &[String]) -> (String, u16) {
    let mut data_path = None;
    let mut port = 3000u16;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "-p" && i + 1 < args.len() {
            port = args[i + 1].parse().unwrap_or_else(|_| {
                eprintln!("Invalid port: {}", args[i + 1]);
                std::process::exit(1);
            });
            i += 2;
        } else {
            data_path = Some(args[i].clone());
            i += 1;
        }
    }
    let Some(data_path) = data_path else {
        eprintln!("Usage: recap serve <data.json> [-p PORT]");
        std::process::exit(1);
    };
    (data_path, port)
}

fn stats(data_path: &str, user_id: &str) {
    let result = tokio::runtime::Runtime::new().unwrap().block_on(async {
        let store = store::Store::open(data_path).await?;
        let engine = engine::Engine::new(store);
        engine.dashboard_stats(user_id, Utc::now())
    });

    match result {
        Ok(stats) => {
            println!("Dashboard for {user_id}:");
            println!("  Weak concepts:      {}", stats.weak_concepts_count);
            println!("  Upcoming revisions: {}", stats.upcoming_revisions_count);
            println!("  Topics in progress: {}", stats.mastery_progress);
            println!("  Streak:             {}", stats.streak);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
