use colored::Colorize;

use crate::config::ServerConfig;
use crate::router::{Route, ROUTES};
use crate::VERSION;

pub struct Message;

// All prefixes padded inside brackets to match "[ERROR]" (5 chars inside)

impl Message {
    pub fn say(msg: &str) {
        println!("{} {}", "[HTTP ]".blue(), msg);
    }

    pub fn cheer(msg: &str) {
        println!("{} {}", "[OK   ]".green(), msg);
    }

    pub fn complain(msg: &str) {
        eprintln!("{} {}", "[WARN ]".yellow(), msg);
    }

    pub fn oops(msg: &str) {
        eprintln!("{} {}", "[ERROR]".red(), msg);
    }

    /// startup banner with the effective configuration
    pub fn print_banner(config: &ServerConfig) {
        Self::say(&format!("{} v{}", "funhttp".bold(), VERSION.dimmed()));
        println!("    {} {}", "www:".dimmed(), config.www_dir.display());
        println!("    {} {}", "files:".dimmed(), config.file_root.display());
        println!("    {} {}", "github:".dimmed(), config.github_api);

        if config.strict_path_containment {
            println!("    {} {}", "paths:".dimmed(), "contained to file root".green());
        } else {
            println!("    {} {}", "paths:".dimmed(), "unrestricted".yellow());
        }
    }

    pub fn print_routes() {
        Self::say("routes:");
        for route in ROUTES {
            println!("    {} {}", "/".dimmed(), Self::route_example(*route));
        }
    }

    fn route_example(route: Route) -> &'static str {
        match route {
            Route::Index => "",
            Route::RandomPage => "random",
            Route::RandomImage => "json",
            Route::File => "file/<name>",
            Route::Multiply => "multiply?num1=<int>&num2=<int>",
            Route::Github => "github?query=<path>",
            Route::GithubActivity => "githubActivity?user=<login>",
            Route::Password => "pass?l=<6-24>&OPT=<123>",
            Route::Unrecognized => "* (400)",
        }
    }
}

/// General info message
#[macro_export]
macro_rules! say {
    ($msg:expr) => {
        $crate::message::Message::say($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::message::Message::say(&format!($fmt, $($arg)*))
    };
}

/// Success message
#[macro_export]
macro_rules! cheer {
    ($msg:expr) => {
        $crate::message::Message::cheer($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::message::Message::cheer(&format!($fmt, $($arg)*))
    };
}

/// Warning message
#[macro_export]
macro_rules! complain {
    ($msg:expr) => {
        $crate::message::Message::complain($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::message::Message::complain(&format!($fmt, $($arg)*))
    };
}

/// Error message
#[macro_export]
macro_rules! oops {
    ($msg:expr) => {
        $crate::message::Message::oops($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::message::Message::oops(&format!($fmt, $($arg)*))
    };
}
