use std::io::Read;

fn main() {
    let mut file = std::fs::File::open("sample-playlists/media-encrypted.m3u8").unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();

    let playlist = m3u8_rewrite::parse(&text);

    println!("Media playlist:\n{:?}", playlist);
    println!("\nRegenerated:\n{}", playlist.to_text());
}
