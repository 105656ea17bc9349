//! Fixed string corpora

/// Format directives and how often each is repeated
pub static FORMAT_DIRECTIVES: [(&str, usize); 6] = [
    ("%n", 100),
    ("%n", 500),
    ("\"%n\"", 500),
    ("%s", 100),
    ("%s", 500),
    ("\"%s\"", 500),
];

/// Lengths around common buffer sizes
pub static LONG_STRING_LENGTHS: [usize; 8] = [128, 255, 256, 257, 1024, 4096, 65535, 65536];

/// Repetition factors applied to valid values
pub static REPETITIONS: [usize; 3] = [2, 16, 256];

/// Fragments with special meaning to shells, markup, paths and C strings
pub static METACHARACTERS: [&str; 13] = [
    "'", "\"", "<", ">", "&", ";", "|", "`", "$(", "%00", "\0", "../", "\\",
];

/// Control characters mixed into random strings
pub static CONTROL_CHARACTERS: [char; 6] = ['\0', '\t', '\n', '\r', '\u{1b}', '\u{7f}'];
