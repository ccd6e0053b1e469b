//! Built-in demonstration image, reachable through the `builtin:demo` origin.

pub const DEMO_IMAGE_NAME: &str = "demo";

/// 256 bytes of fixed pseudo-random content
pub const DEMO_IMAGE: [u8; 256] = [
    0x9e, 0xdd, 0x07, 0x09, 0x5e, 0xc5, 0xb9, 0x80, 0x10, 0x22, 0x02, 0x8c, 0xcb, 0xa4, 0xdb, 0x74,
    0xbe, 0x7e, 0x7d, 0xd6, 0x96, 0x4b, 0xf5, 0xad, 0xc6, 0x7b, 0x2d, 0x87, 0xdd, 0x7b, 0xff, 0x96,
    0x98, 0x8a, 0xf4, 0xbd, 0x1c, 0xce, 0xd6, 0x5e, 0xa8, 0xa0, 0x0c, 0xe1, 0x66, 0xd8, 0xa5, 0xc9,
    0x29, 0x6b, 0x40, 0x97, 0x48, 0xda, 0xe2, 0xf1, 0xf8, 0x8c, 0xe2, 0xda, 0xa8, 0x9a, 0x21, 0x1e,
    0xa2, 0x75, 0xd5, 0x71, 0x9f, 0xd1, 0x76, 0x70, 0x32, 0x92, 0x2f, 0x07, 0x8b, 0x90, 0xcb, 0x6d,
    0xed, 0xcb, 0x67, 0xa8, 0x56, 0x27, 0x36, 0x2c, 0xd7, 0x82, 0x63, 0x62, 0xc0, 0x4c, 0x5c, 0x4d,
    0x3c, 0x74, 0x41, 0x6f, 0x5f, 0x06, 0x66, 0x54, 0x7f, 0xf6, 0x7d, 0x20, 0x5e, 0xe3, 0x31, 0x96,
    0xed, 0x10, 0x3a, 0x98, 0x3c, 0x18, 0xea, 0x31, 0x18, 0xb6, 0x91, 0x23, 0xf3, 0xb6, 0x1a, 0xb1,
    0xe5, 0x0e, 0x56, 0x91, 0xf1, 0x8b, 0xb3, 0xfa, 0x70, 0x66, 0x54, 0x14, 0x0b, 0x51, 0xc8, 0x74,
    0x9f, 0x28, 0xb5, 0xe0, 0x93, 0x76, 0x63, 0x77, 0xb1, 0xf9, 0xbc, 0xf3, 0x70, 0x5e, 0xba, 0x23,
    0x19, 0x79, 0x47, 0x3f, 0xed, 0xb2, 0xa2, 0xa2, 0xd2, 0xed, 0xf1, 0xde, 0xfe, 0x15, 0x47, 0x3e,
    0x3f, 0x81, 0x8e, 0xe7, 0x5b, 0x02, 0x71, 0x16, 0x7c, 0x81, 0xcc, 0x95, 0x35, 0xaa, 0x9c, 0xc8,
    0x5f, 0xb0, 0xa5, 0x04, 0xc3, 0x1f, 0x6a, 0x2f, 0xc5, 0x08, 0x3e, 0xbb, 0xd1, 0x56, 0x6f, 0x1a,
    0x58, 0x4b, 0xc2, 0x07, 0x8b, 0x13, 0x5d, 0x60, 0x24, 0xb9, 0xa5, 0x59, 0x7e, 0x54, 0x9d, 0x02,
    0x0a, 0x59, 0xf0, 0xd1, 0x80, 0x24, 0x22, 0xdd, 0x32, 0x0e, 0x89, 0x6d, 0xe5, 0xc9, 0x67, 0x68,
    0x04, 0xe4, 0xfb, 0xef, 0x18, 0xc3, 0xc9, 0x83, 0xdd, 0x2a, 0xfa, 0xe1, 0x27, 0x5c, 0xf8, 0xa5,
];

/// Look up a built-in image by name
pub fn builtin_image(name: &str) -> Option<&'static [u8]> {
    match name {
        DEMO_IMAGE_NAME => Some(&DEMO_IMAGE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_image_lookup() {
        let image = builtin_image("demo").unwrap();
        assert_eq!(image.len(), 256);
        assert_eq!(&image[..5], &[0x9e, 0xdd, 0x07, 0x09, 0x5e]);
        assert_eq!(image[255], 0xa5);
        assert!(builtin_image("missing").is_none());
    }
}
