// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_prose(paragraphs: usize) -> String {
    let base = "The quick brown fox jumps over the lazy dog.\nPack my box with five dozen liquor jugs.\n\n";
    base.repeat(paragraphs)
}

/// Every `stride`th line gets a word swapped and every other paragraph loses
/// its second line.
#[allow(dead_code)]
pub fn edit_prose(source: &str, stride: usize) -> String {
    let mut output = String::with_capacity(source.len());
    for (index, line) in source.split_inclusive('\n').enumerate() {
        if index % 6 == 1 {
            continue;
        }
        if index % stride == 0 {
            output.push_str(&line.replace("lazy", "sleepy"));
        } else {
            output.push_str(line);
        }
    }
    output
}
