// Single-object frames: exact bytes, header parsing, marker validation,
// truncation at every length and continuous-stream decoding.

#[cfg(test)]
mod tests {
    use cryo_core::framing::{parse_frame, FrameHeader, FRAME_OVERHEAD};
    use cryo_core::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        count: i32,
    }
    typed_struct!(Counter { count });

    #[derive(Debug, Clone, PartialEq)]
    struct Link {
        value: i32,
        next: Option<Box<Link>>,
    }
    typed_struct!(Link { value, next });

    fn frame(tag: Tag, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![0xAB, tag, 0x02];
        out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        out.extend_from_slice(payload);
        out.push(0xCD);
        out
    }

    /// Strict payload of `levels` linked `Link { value: 7, .. }` values,
    /// written by hand so it can exceed what the encoder accepts.
    fn chain_payload(next_tag: Tag, levels: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(levels * 13);
        for i in (0..levels).rev() {
            out.extend_from_slice(&[0x01, 0x02, 0x00, 0x04, 0, 0, 0, 7]);
            out.extend_from_slice(&[next_tag, 0x02]);
            out.extend_from_slice(&(1 + 13 * i as u16).to_be_bytes());
            out.push(u8::from(i > 0));
        }
        out
    }

    fn chain(levels: usize) -> Link {
        let mut link = Link { value: 7, next: None };
        for _ in 1..levels {
            link = Link { value: 7, next: Some(Box::new(link)) };
        }
        link
    }

// # 1. Exact frame bytes

    #[test]
    fn int32_frame_bytes() {
        let registry = Registry::with_primitives();

        let frame = Encoder::new(&registry).encode(&42i32).unwrap();
        assert_eq!(frame, [0xAB, 0x01, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x2A, 0xCD]);

        let back: i32 = Decoder::new(&registry, frame.as_slice()).decode_as().unwrap();
        assert_eq!(back, 42);
    }

    #[test]
    fn struct_frame_bytes() {
        let mut registry = Registry::with_primitives();
        assert_eq!(registry.register_struct::<Counter>().unwrap(), 200);

        let frame = Encoder::new(&registry).encode(&Counter { count: 7 }).unwrap();
        assert_eq!(
            frame,
            [0xAB, 0xC8, 0x02, 0x00, 0x08, 0x01, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x07, 0xCD]
        );

        let back: Counter = Decoder::new(&registry, frame.as_slice()).decode_as().unwrap();
        assert_eq!(back, Counter { count: 7 });
    }

    #[test]
    fn encoder_keeps_no_state_between_calls() {
        let registry = Registry::with_primitives();
        let mut enc = Encoder::new(&registry);

        assert!(enc.encode_value(&TypeDesc::I32, &Value::Bool(true)).is_err());
        let frame = enc.encode(&1u8).unwrap();
        assert_eq!(frame, [0xAB, 0x05, 0x02, 0x00, 0x01, 0x01, 0xCD]);
    }

// # 2. Header parsing

    #[test]
    fn parse_frame_view() {
        let registry = Registry::with_primitives();
        let frame = Encoder::new(&registry).encode(&"abc".to_string()).unwrap();

        let view = parse_frame(&frame).unwrap();
        assert_eq!(view.header, FrameHeader { tag: 12, len_of_len: 2, payload_len: 3 });
        assert_eq!(view.payload, b"abc");
        assert_eq!(view.header.frame_len(), frame.len());
        assert_eq!(view.header.overhead(), FRAME_OVERHEAD);
    }

    #[test]
    fn wider_length_of_length_is_accepted_on_decode() {
        let registry = Registry::with_primitives();
        let frame = [0xAB, 0x05, 0x04, 0x00, 0x00, 0x00, 0x01, 0x09, 0xCD];

        let back: u8 = Decoder::new(&registry, &frame[..]).decode_as().unwrap();
        assert_eq!(back, 9);
        assert_eq!(decode_frame(&registry, &frame).unwrap().downcast::<u8>().unwrap(), 9);
    }

    #[test]
    fn zero_length_of_length_is_malformed() {
        let registry = Registry::with_primitives();
        let frame = [0xAB, 0x05, 0x00, 0xCD];

        let err = Decoder::new(&registry, &frame[..]).decode().unwrap_err();
        assert!(matches!(err, CodecError::Malformed { .. }));
    }

// # 3. Marker validation

    #[test]
    fn bad_begin_marker_is_framing_error() {
        let registry = Registry::with_primitives();
        let frame = [0xAC, 0x05, 0x02, 0x00, 0x01, 0x01, 0xCD];

        let err = Decoder::new(&registry, &frame[..]).decode().unwrap_err();
        assert!(matches!(err, CodecError::Framing { marker: "begin marker", .. }));
        assert!(matches!(parse_frame(&frame), Err(CodecError::Framing { .. })));
    }

    #[test]
    fn bad_end_marker_is_framing_error() {
        let registry = Registry::with_primitives();
        let frame = [0xAB, 0x05, 0x02, 0x00, 0x01, 0x01, 0xCE];

        let err = Decoder::new(&registry, &frame[..]).decode().unwrap_err();
        assert!(matches!(err, CodecError::Framing { marker: "end marker", .. }));
    }

    #[test]
    fn unknown_tag_is_reported() {
        let registry = Registry::with_primitives();
        let frame = [0xAB, 0xF0, 0x02, 0x00, 0x00, 0xCD];

        let err = Decoder::new(&registry, &frame[..]).decode().unwrap_err();
        assert!(matches!(err, CodecError::UnknownTag(0xF0)));
        assert!(err.to_string().contains("0xf0"));
    }

    #[test]
    fn payload_over_u16_overflows() {
        let registry = Registry::with_primitives();
        let big = "x".repeat(u16::MAX as usize + 1);

        let err = Encoder::new(&registry).encode(&big).unwrap_err();
        assert!(matches!(err, CodecError::Overflow { .. }));
    }

// # 4. Truncation safety

    #[test]
    fn truncated_mid_payload() {
        let registry = Registry::with_primitives();
        let frame = Encoder::new(&registry).encode(&42i32).unwrap();

        let err = Decoder::new(&registry, &frame[..7]).decode().unwrap_err();
        assert!(matches!(err, CodecError::Truncated { needed: 4, available: 2, .. }));
    }

    #[test]
    fn every_prefix_is_truncated() {
        let mut registry = Registry::with_primitives();
        let value = vec![Counter { count: 1 }, Counter { count: -1 }];
        let frame = Encoder::resolving(&mut registry).encode(&value).unwrap();

        for n in 0..frame.len() {
            let err = Decoder::new(&registry, &frame[..n]).decode().unwrap_err();
            assert!(err.is_truncated(), "prefix {}: {}", n, err);
            assert_eq!(err.is_end_of_stream(), n == 0);
            assert!(parse_frame(&frame[..n]).unwrap_err().is_truncated());
        }
    }

    #[test]
    fn declared_length_longer_than_data() {
        let registry = Registry::with_primitives();
        let frame = [0xAB, 0x01, 0x02, 0xFF, 0xFF, 0x00];

        let err = Decoder::new(&registry, &frame[..]).decode().unwrap_err();
        assert!(matches!(err, CodecError::Truncated { needed: 0xFFFF, available: 1, .. }));
    }

    #[test]
    fn trailing_bytes_after_slice_frame() {
        let frame = [0xAB, 0x05, 0x02, 0x00, 0x01, 0x01, 0xCD, 0x00];

        assert!(matches!(parse_frame(&frame), Err(CodecError::LengthMismatch { .. })));
    }

// # 5. Continuous streams of frames

    #[test]
    fn back_to_back_frames_until_end_of_stream() {
        let registry = Registry::with_primitives();
        let mut enc = Encoder::new(&registry);

        let mut wire = Vec::new();
        enc.encode_to(&1i64, &mut wire).unwrap();
        enc.encode_to(&"two".to_string(), &mut wire).unwrap();
        enc.encode_to(&true, &mut wire).unwrap();

        let mut dec = Decoder::new(&registry, wire.as_slice());
        assert_eq!(dec.decode_as::<i64>().unwrap(), 1);
        assert_eq!(dec.decode_as::<String>().unwrap(), "two");
        assert!(dec.decode_as::<bool>().unwrap());
        assert!(dec.decode().unwrap_err().is_end_of_stream());
    }

    #[test]
    fn decoder_iterates_and_stops_cleanly() {
        let registry = Registry::with_primitives();
        let mut enc = Encoder::new(&registry);

        let mut wire = Vec::new();
        for i in 0..5u32 {
            wire.extend(enc.encode(&i).unwrap());
        }

        let values: Vec<u32> = Decoder::new(&registry, wire.as_slice())
            .map(|d| d.unwrap().downcast::<u32>().unwrap())
            .collect();
        assert_eq!(values, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn decoder_iteration_surfaces_corruption_once() {
        let registry = Registry::with_primitives();
        let mut wire = Encoder::new(&registry).encode(&3u8).unwrap();
        wire.extend_from_slice(&[0xAB, 0x05]);

        let results: Vec<_> = Decoder::new(&registry, wire.as_slice()).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().is_truncated());
    }

    #[test]
    fn decode_as_checks_the_type() {
        let registry = Registry::with_primitives();
        let frame = Encoder::new(&registry).encode(&5i32).unwrap();

        let err = Decoder::new(&registry, frame.as_slice()).decode_as::<i64>().unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

// # 6. Nesting depth

    #[test]
    fn hand_built_chain_matches_encoder_output() {
        let mut registry = Registry::with_primitives();
        let link = registry.register_struct::<Link>().unwrap();
        let next = registry.tag_of(&Option::<Box<Link>>::type_desc()).unwrap();

        let encoded = Encoder::new(&registry).encode(&chain(3)).unwrap();
        assert_eq!(encoded, frame(link, &chain_payload(next, 3)));
    }

    #[test]
    fn moderately_deep_chain_decodes() {
        let mut registry = Registry::with_primitives();
        let link = registry.register_struct::<Link>().unwrap();
        let next = registry.tag_of(&Option::<Box<Link>>::type_desc()).unwrap();

        let wire = frame(link, &chain_payload(next, 100));
        let back: Link = Decoder::new(&registry, wire.as_slice()).decode_as().unwrap();
        assert_eq!(back, chain(100));
    }

    #[test]
    fn over_deep_frame_is_an_error() {
        let mut registry = Registry::with_primitives();
        let link = registry.register_struct::<Link>().unwrap();
        let next = registry.tag_of(&Option::<Box<Link>>::type_desc()).unwrap();

        // Each level costs two nesting steps (struct, then pointer).
        let wire = frame(link, &chain_payload(next, 4_000));
        let err = Decoder::new(&registry, wire.as_slice()).decode().unwrap_err();
        assert!(matches!(err.root_cause(), CodecError::Malformed { context: "nesting depth", .. }));
        assert!(decode_frame(&registry, &wire).is_err());
    }

    #[test]
    fn over_deep_value_is_not_encoded() {
        let mut registry = Registry::with_primitives();
        registry.register_struct::<Link>().unwrap();

        let err = Encoder::new(&registry).encode(&chain(200)).unwrap_err();
        assert!(matches!(err.root_cause(), CodecError::Malformed { context: "nesting depth", .. }));
    }
}
