use super::*;

#[test]
fn parses_short_long_and_alpha_forms() {
    assert_eq!(Rgba8::parse_hex("#fff").unwrap(), Rgba8::WHITE);
    assert_eq!(Rgba8::parse_hex("FF0000").unwrap(), Rgba8::rgb(255, 0, 0));
    assert_eq!(
        Rgba8::parse_hex("#00ff0080").unwrap(),
        Rgba8 {
            r: 0,
            g: 255,
            b: 0,
            a: 128
        }
    );
}

#[test]
fn rejects_malformed_colors() {
    assert!(Rgba8::parse_hex("#12").is_err());
    assert!(Rgba8::parse_hex("#zzzzzz").is_err());
    assert!(Rgba8::parse_hex("#ééé").is_err());
}

#[test]
fn serde_uses_hex_strings() {
    let c: Rgba8 = serde_json::from_str("\"#336699\"").unwrap();
    assert_eq!(c, Rgba8::rgb(0x33, 0x66, 0x99));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#336699\"");

    let translucent = Rgba8 {
        r: 1,
        g: 2,
        b: 3,
        a: 4,
    };
    assert_eq!(translucent.to_hex(), "#01020304");
}
