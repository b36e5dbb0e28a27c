//! # TempleCode
//!
//! BASIC, PILOT and Logo turtle graphics in one language.
//!

fn main() {
    std::process::exit(templecode::term::main());
}
