use std::io;

use unilex_g2p::{G2P, Language, lexicon};

const FREQUENCY_LIST: &str = "\
# toy frequency list
120\tel
85\tgàto
40\tche # conjunction
12\tmagnar
3\tbaùco
";

fn main() {
    let g2p = G2P::new(Language::Venetian).expect("embedded ruleset should compile");
    lexicon::generate(&g2p, FREQUENCY_LIST.as_bytes(), io::stdout().lock())
        .expect("toy list should validate");
}
