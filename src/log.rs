//! Console output macros.
//!
//! Every line is prefixed with a bold level tag, colored only when the target
//! stream supports it (see [`owo_colors::set_override`] for `--no-color`).

#[doc(hidden)]
#[macro_export]
macro_rules! __tag {
    ($stream:ident, $tag:literal, $style:expr) => {{
        use owo_colors::OwoColorize;

        $tag.if_supports_color(owo_colors::Stream::$stream, |s| s.style($style))
            .to_string()
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        eprintln!(
            "{}: {}",
            $crate::__tag!(Stderr, "error", owo_colors::Style::new().bold().red()),
            format_args!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        println!(
            "{}: {}",
            $crate::__tag!(Stdout, "info", owo_colors::Style::new().bold().green()),
            format_args!($($arg)*)
        )
    };
}

/// One line per generation step (created, rendered, copied), indented under
/// the surrounding `info!` header.
#[macro_export]
macro_rules! step {
    ($verb:literal, $($arg:tt)+) => {
        println!(
            "  {} {}",
            $crate::__tag!(Stdout, $verb, owo_colors::Style::new().bold().cyan()),
            format_args!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        println!(
            "{}: {}",
            $crate::__tag!(Stdout, "warning", owo_colors::Style::new().bold().yellow()),
            format_args!($($arg)*)
        )
    };
}

/// Only printed when `BOILERPLATE_TRACE` is set.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        if std::env::var_os("BOILERPLATE_TRACE").is_some() {
            println!(
                "{}: {}",
                $crate::__tag!(Stdout, "trace", owo_colors::Style::new().bold()),
                format_args!($($arg)*)
            );
        }
    };
}
