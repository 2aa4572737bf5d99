use palette::Srgba;

/// Formats a color as an upper-case hexadecimal string.
///
/// The result is `#RRGGBB`, or `#RRGGBBAA` if `include_alpha` is set,
/// with every channel padded to two digits.
///
/// # Examples
/// ```
/// # use gama::to_hex;
/// # use palette::Srgba;
/// assert_eq!(to_hex(Srgba::new(255, 0, 0, 255), true), "#FF0000FF");
/// assert_eq!(to_hex(Srgba::new(255, 0, 0, 255), false), "#FF0000");
/// ```
#[must_use]
pub fn to_hex(color: Srgba<u8>, include_alpha: bool) -> String {
    let (r, g, b, a) = color.into_components();
    if include_alpha {
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    } else {
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}
