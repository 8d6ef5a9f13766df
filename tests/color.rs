mod tests {
    use silvanus_strip::color::{BLACK, HsvColor, Rgb, rgb_from_u32, scale};
    use smart_leds::hsv::hsv2rgb;

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(HsvColor::new(0.0, 1.0, 1.0).to_rgb(), RED);
        assert_eq!(HsvColor::new(120.0, 1.0, 1.0).to_rgb(), GREEN);
        assert_eq!(HsvColor::new(240.0, 1.0, 1.0).to_rgb(), BLUE);
    }

    #[test]
    fn test_hsv_quantization() {
        let hsv = HsvColor::new(180.0, 0.5, 1.0).to_hsv8();
        assert_eq!((hsv.hue, hsv.sat, hsv.val), (128, 127, 255));

        let hsv = HsvColor::new(359.9, 2.0, -0.5).to_hsv8();
        assert_eq!((hsv.hue, hsv.sat, hsv.val), (255, 255, 0));

        // Between primaries the crate's sector math decides the mix
        let yellow = HsvColor::new(60.0, 1.0, 1.0).to_rgb();
        assert_eq!(yellow, hsv2rgb(HsvColor::new(60.0, 1.0, 1.0).to_hsv8()));
        assert_eq!((yellow.r, yellow.b), (255, 0));
        assert!(yellow.g > 240);
    }

    #[test]
    fn test_hsv_hue_wraps() {
        assert_eq!(HsvColor::new(360.0, 1.0, 1.0).to_rgb(), RED);
        assert_eq!(HsvColor::new(-120.0, 1.0, 1.0).to_rgb(), BLUE);
        assert_eq!(HsvColor::new(480.0, 1.0, 1.0).to_rgb(), GREEN);
    }

    #[test]
    fn test_hsv_gray_and_clamping() {
        assert_eq!(
            HsvColor::new(33.0, 0.0, 0.5).to_rgb(),
            Rgb {
                r: 127,
                g: 127,
                b: 127
            }
        );
        assert_eq!(HsvColor::new(0.0, 1.0, 2.0).to_rgb(), RED);
        assert_eq!(HsvColor::new(0.0, 1.0, -1.0).to_rgb(), BLACK);
        assert_eq!(Rgb::from(HsvColor::new(240.0, 1.0, 1.0)), BLUE);
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale(RED, 1.0), RED);
        assert_eq!(scale(RED, 0.5), Rgb { r: 127, g: 0, b: 0 });
        assert_eq!(scale(RED, 0.0), BLACK);
        assert_eq!(scale(RED, -1.0), BLACK);
        assert_eq!(scale(RED, f32::NAN), BLACK);
        assert_eq!(
            scale(Rgb { r: 200, g: 10, b: 0 }, 2.0),
            Rgb { r: 255, g: 20, b: 0 }
        );
    }

    #[test]
    fn test_rgb_from_u32() {
        assert_eq!(
            rgb_from_u32(0x0012_3456),
            Rgb {
                r: 0x12,
                g: 0x34,
                b: 0x56
            }
        );
        assert_eq!(rgb_from_u32(0x00FF_0000), RED);
    }
}
