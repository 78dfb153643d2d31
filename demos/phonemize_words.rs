use unilex_g2p::{G2P, Language};

fn main() {
    let g2p = G2P::new(Language::Venetian).expect("embedded ruleset should compile");
    let words = vec!["gàto", "ghe", "ciao", "chiesa", "cantar", "sgrànfiña"];

    println!("=== Venetian G2P ===");
    for word in words {
        match g2p.phonemize(word) {
            Ok(ipa) => println!("{}: {}", word, ipa),
            Err(err) => println!("{}: error: {}", word, err),
        }
    }
}
