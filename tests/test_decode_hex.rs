use std::str::FromStr;

use anyhow::Result;
use num_bigint::{BigInt, BigUint};

use klever_sdk::abi::{Error, VmOutputDecoder};
use klever_sdk::{Address, DecodedValue};
use klever_sdk_test_utils::{example_decoder, init_logger, lottery_decoder};

const OWNER: &str = "klv1velayazgrn6mqaqckt7utk9656h8zu3ex4ln8rx7n8p0vy4fd20qmwh4p5";
const CONTRACT: &str = "klv1qqqqqqqqqqqqqpgq4a9p9vrpu5gu4yrg4axg8ey3s3m7d34dd20q5cqaav";

pub const STRUCT_HEX: &str = "0052212219605d7c36eece5eb03dc25452212219605d7c36eece5eb03dc2540000001574657374696e67206f757470757473207479706573000000034b4c56667fd274481cf5b07418b2fdc5d8baa6ae717239357f338cde99c2f612a96a9e0000000a050610188339c82a68720000002b3733373239383739323733353739383830313838373636373336343137383738393337373538373738373400000012010a0000003500000002aaaaaaaaaaaaa80000000005000000034b4c56000000034b4649000000084b49442d38473941000000084458422d483838470000000a43484950532d4e383941";

const LIST_LIST_LIST_I64_HEX: &str = "0000000200000003000000006fab0276000000000000001cffffffffffff9ca400000003fffffffffffffffe000000000001e308fffffffff1b3cfdc0000000200000003fffffffffe4932e1000007f24bf1555700000000000000800000000300000010d9e95b690000000000000001ffffffffffffff9c";

const LIST_LIST_LIST_TOKEN_HEX: &str = "00000002000000030000000a43484950532d4e383941000000034b4c56000000034b464900000003000000085446542d3738364a00000008534a412d4c4b394800000008514b552d3748483100000002000000030000000a43484950532d4e383941000000034b4c56000000034b464900000003000000085446542d3738364a00000008534a412d4c4b394800000008514b552d37484831";

const LIST_LIST_LIST_BIG_INT_HEX: &str = "00000002000000030000000387efdb00000002349000000008c91131a14fc23dac000000030000000f39bf6e49095ff7dca078957ceb928e0000000fc64091b6f6a008235f876a83146d72000000050103cf744100000002000000030000002839383735373638393739373839393739393837353839373332383739333532313034383438333639000000292d3938373537363839373937383939373939383735383937333238373933353231303438343833363900000002343200000003000000037810250000000154000000064d9f58c4219f";

const WINNERS_HEX: &str = "0000000b226474c28c44db45a9b52945192f533afefe9c4dbf24fccee16dc0553972ac1f000000040ee6b28000000010eaf4866822d00fcfdd9247e953de7f937619c1720336a5c03d6f2939ce63bacd000000040a21fe8000000002eaf4866822d00fcfdd9247e953de7f937619c1720336a5c03d6f2939ce63bacd0000000401312d0000000001eaf4866822d00fcfdd9247e953de7f937619c1720336a5c03d6f2939ce63bacd00000003989680000000012fdc794513bd5d6a96bd1c4369244285a9e9ed840cf6d2480296fc2716ed2f710000000398968000000003226474c28c44db45a9b52945192f533afefe9c4dbf24fccee16dc0553972ac1f0000000401c9c3800000000243016b136874f81ed9c4b1b12c2b1db466127b74d7e276296a6cf7f95992c3bd0000000401c9c380000000019f1354706d75aeb684f26d7dea1fbda17e264c7595cc1eddec0b8968c1be85240000000398968000000001667fd274481cf5b07418b2fdc5d8baa6ae717239357f338cde99c2f612a96a9e00000003989680";

fn big(value: &str) -> DecodedValue {
    DecodedValue::BigInt(BigInt::from_str(value).unwrap())
}

fn big_u(value: &str) -> DecodedValue {
    DecodedValue::BigUint(BigUint::from_str(value).unwrap())
}

fn address(value: &str) -> DecodedValue {
    DecodedValue::Address(Address::from_str(value).unwrap())
}

fn list<T: Into<DecodedValue>>(items: impl IntoIterator<Item = T>) -> DecodedValue {
    DecodedValue::List(items.into_iter().map(Into::into).collect())
}

fn some(value: DecodedValue) -> DecodedValue {
    DecodedValue::Option(Some(Box::new(value)))
}

fn decode(decoder: &VmOutputDecoder, endpoint: &str, hex: &str) -> DecodedValue {
    decoder
        .decode_hex(endpoint, &[hex])
        .unwrap_or_else(|e| panic!("{endpoint}: {e}"))
}

fn list_list_i32() -> DecodedValue {
    list([
        list([1873478262i32, 28, -25436]),
        list([-2i32, 123656, -239874084]),
    ])
}

fn list_list_list_big_int() -> DecodedValue {
    list([
        list([
            list(["-7868453", "13456", "-3958328028584329812"].map(big)),
            list([
                "299843598872398459348567275690758798",
                "-299843598872398459348567275690758798",
                "4358894657",
            ]
            .map(big)),
        ]),
        list([
            list([
                "9875768979789979987589732879352104848369",
                "-9875768979789979987589732879352104848369",
                "42",
            ]
            .map(big)),
            list(["7868453", "84", "85346784387487"].map(big)),
        ]),
    ])
}

#[test]
fn test_single_values() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    let cases = [
        ("managed_buffer", "74657374696e67206f757470757473207479706573", "testing outputs types".into()),
        ("bool_false", "", DecodedValue::Bool(false)),
        ("bool_true", "01", DecodedValue::Bool(true)),
        ("usize_number", "fdc20cbf", DecodedValue::U32(4257352895)),
        ("isize_number", "40cf4061", DecodedValue::I32(1087324257)),
        ("isize_minus_number", "bf30bf9f", DecodedValue::I32(-1087324257)),
        ("token_identifier", "4b4c56", "KLV".into()),
        (
            "owner_address",
            "667fd274481cf5b07418b2fdc5d8baa6ae717239357f338cde99c2f612a96a9e",
            address(OWNER),
        ),
        ("number_i8", "52", DecodedValue::I8(82)),
        ("number_minus_i8", "ae", DecodedValue::I8(-82)),
        ("number_i16", "2122", DecodedValue::I16(8482)),
        ("number_minus_i16", "dede", DecodedValue::I16(-8482)),
        ("number_i32", "19605d7c", DecodedValue::I32(425745788)),
        ("number_minus_i32", "e69fa284", DecodedValue::I32(-425745788)),
        ("number_i64", "36eece5eb03dc254", DecodedValue::I64(3958328028584329812)),
        ("number_minus_i64", "c91131a14fc23dac", DecodedValue::I64(-3958328028584329812)),
    ];
    for (endpoint, hex, expected) in cases {
        assert_eq!(decode(&decoder, endpoint, hex), expected, "{endpoint}");
    }
    Ok(())
}

#[test]
fn test_big_integers() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    let cases = [
        ("big_minus_s_10", "2d3130", big("-10")),
        ("big_minus_i8", "ae", big("-82")),
        ("big_i8", "52", big("82")),
        ("big_minus_i16", "dede", big("-8482")),
        ("big_i16", "2122", big("8482")),
        ("big_minus_i32", "e69fa284", big("-425745788")),
        ("big_i32", "19605d7c", big("425745788")),
        ("big_minus_i64", "c91131a14fc23dac", big("-3958328028584329812")),
        ("big_i64", "36eece5eb03dc254", big("3958328028584329812")),
        (
            "big_u_number",
            "39bf6e49095ff7dca078957ceb928e",
            big("299843598872398459348567275690758798"),
        ),
        (
            "big_minus_u_number",
            "c64091b6f6a008235f876a83146d72",
            big("-299843598872398459348567275690758798"),
        ),
        (
            "big_s_number",
            "393833343735393337343536383932343739363738383930313736393831393038353637383935373639303738353132393836373938323537",
            big("983475937456892479678890176981908567895769078512986798257"),
        ),
        (
            "big_minus_s_number",
            "2d393833343735393337343536383932343739363738383930313736393831393038353637383935373639303738353132393836373938323537",
            big("-983475937456892479678890176981908567895769078512986798257"),
        ),
        ("big_u_s_10", "3130", big_u("10")),
        (
            "big_u_s_number",
            "3832373432383733363433343735393733353933343736393733393637393337363938333435373836393833393035363938393739373839373839",
            big_u("82742873643475973593476973967937698345786983905698979789789"),
        ),
        ("big_u8", "52", big_u("82")),
        ("big_u16", "2122", big_u("8482")),
        ("big_u32", "19605d7c", big_u("425745788")),
        ("big_u64", "36eece5eb03dc254", big_u("3958328028584329812")),
        (
            "big_u128",
            "1dc7766516260b32b52ff11612d5710e",
            big_u("39583280285843298128735477835272384782"),
        ),
    ];
    for (endpoint, hex, expected) in cases {
        assert_eq!(decode(&decoder, endpoint, hex), expected, "{endpoint}");
    }
    Ok(())
}

#[test]
fn test_big_floats() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    let cases = [
        ("test_from_fraction", "010a0000003500000000c000000000000000", 0.75),
        ("test_float_neg", "010b00000035000000008000000000000000", -0.5),
        ("test_float_parts", "010a000000350000000f93eac189374bc800", 18933.378),
        ("test_float_sci", "010a00000035fffffffcf5c28f5c28f5c000", 0.06),
        ("test_float_from_generics", "010a00000035000000028000000000000000", 2.0),
        ("test_float_bi", "010b0000003500000053d7da3fa6c03de800", -8154678164717479819989764.0),
        ("test_float_bu", "010a000000350000005bb35b36c567c96000", 1734627739277592794878918977.0),
    ];
    for (endpoint, hex, expected) in cases {
        let DecodedValue::BigFloat(value) = decode(&decoder, endpoint, hex) else {
            panic!("{endpoint} did not decode to a BigFloat");
        };
        assert_eq!(value.to_f64(), expected, "{endpoint}");
    }
    Ok(())
}

#[test]
fn test_lists() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    let cases = [
        (
            "list_token_identifier",
            "000000034b4c56000000034b4649000000084b49442d38473941000000084458422d483838470000000a43484950532d4e383941",
            list(["KLV", "KFI", "KID-8G9A", "DXB-H88G", "CHIPS-N89A"]),
        ),
        ("list_int32", "000000080000005700000065fffffffb", list([8i32, 87, 101, -5])),
        (
            "list_int64",
            "000000000000000200000000000000570e09174747d3c452fffffffffffffffbe51dd01a95946e83",
            list([2i64, 87, 1011365186236564562, -5, -1937163452102185341]),
        ),
        ("list_u16", "3fd600a7000203f3", list([16342u16, 167, 2, 1011])),
        (
            "list_u32",
            "00000003000f880ccc61aa59003ab9b8",
            list([3u32, 1017868, 3428952665, 3848632]),
        ),
        (
            "list_u64",
            "00000000053532bd0002ac5552d00e95000000000000000255868c6974ec6a9b",
            list([87372477u64, 752432414985877, 2, 6162767524664208027]),
        ),
        (
            "list_bign",
            "000000050577f695350000000109000000072d383233343732000000063533343233370000000f39bf6e49095ff7dca078957ceb928e0000000fc64091b6f6a008235f876a83146d72",
            list([
                "23487485237",
                "9",
                "-823472",
                "534237",
                "299843598872398459348567275690758798",
                "-299843598872398459348567275690758798",
            ]
            .map(big)),
        ),
        (
            "list_bigun",
            "00000001ea00000002266a000000043a9e8554000000087864b47dcf08ef8c0000004438323732333637353235343337363537363738363334373234333635383236333538363832333536383236383931323733363435373637383639383637373838373635370000000f0864a6c0c92180ec36795616644d36",
            list([
                "234",
                "9834",
                "983467348",
                "8675257234659798924",
                "82723675254376576786347243658263586823568268912736457678698677887657",
                "43579827367895347689574268789869878",
            ]
            .map(big_u)),
        ),
        (
            "list_address",
            "667fd274481cf5b07418b2fdc5d8baa6ae717239357f338cde99c2f612a96a9e667fd274481cf5b07418b2fdc5d8baa6ae717239357f338cde99c2f612a96a9e",
            list([address(OWNER), address(OWNER)]),
        ),
        ("list_bool", "01000001", list([true, false, false, true])),
    ];
    for (endpoint, hex, expected) in cases {
        assert_eq!(decode(&decoder, endpoint, hex), expected, "{endpoint}");
    }
    Ok(())
}

#[test]
fn test_nested_lists() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    assert_eq!(
        decode(&decoder, "list_list_bool", "00000004010000010000000401000100"),
        list([list([true, false, false, true]), list([true, false, true, false])])
    );
    assert_eq!(
        decode(
            &decoder,
            "list_list_i32",
            "000000036fab02760000001cffff9ca400000003fffffffe0001e308f1b3cfdc"
        ),
        list_list_i32()
    );
    assert_eq!(
        decode(
            &decoder,
            "list_list_i64",
            "0000000319ffee93a36dc12a000000000000001cd7e571502441e18400000003fffffffffffffffe000000000001e308fffffffff1b3cfdc"
        ),
        list([
            list([1873478287878897962i64, 28, -2889778996868685436]),
            list([-2i64, 123656, -239874084]),
        ])
    );
    assert_eq!(
        decode(
            &decoder,
            "list_list_tokens",
            "00000003000000034b4c56000000034b4649000000084b49442d3847394100000003000000084458422d483838470000000a43484950532d4e383941000000084646542d32424836"
        ),
        list([
            list(["KLV", "KFI", "KID-8G9A"]),
            list(["DXB-H88G", "CHIPS-N89A", "FFT-2BH6"]),
        ])
    );

    let list_list_list_i64 = list([
        list([
            list([1873478262i64, 28, -25436]),
            list([-2i64, 123656, -239874084]),
        ]),
        list([
            list([-28757279i64, 8737237587287, 128]),
            list([72375425897i64, 1, -100]),
        ]),
    ]);
    assert_eq!(
        decode(&decoder, "list_list_list_i64", LIST_LIST_LIST_I64_HEX),
        list_list_list_i64
    );

    let tokens = list([
        list(["CHIPS-N89A", "KLV", "KFI"]),
        list(["TFT-786J", "SJA-LK9H", "QKU-7HH1"]),
    ]);
    assert_eq!(
        decode(&decoder, "list_list_list_token", LIST_LIST_LIST_TOKEN_HEX),
        list([tokens.clone(), tokens])
    );
    assert_eq!(
        decode(&decoder, "list_list_list_big_int", LIST_LIST_LIST_BIG_INT_HEX),
        list_list_list_big_int()
    );
    Ok(())
}

#[test]
fn test_options() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    let cases = [
        ("option_bytes_null", "", DecodedValue::absent()),
        ("option_i8", "0152", some(DecodedValue::I8(82))),
        ("option_i16", "012122", some(DecodedValue::I16(8482))),
        ("option_i32", "0119605d7c", some(DecodedValue::I32(425745788))),
        ("option_i64", "0136eece5eb03dc254", some(DecodedValue::I64(3958328028584329812))),
        ("option_u8", "0152", some(DecodedValue::U8(82))),
        ("option_u16", "012122", some(DecodedValue::U16(8482))),
        ("option_u32", "0119605d7c", some(DecodedValue::U32(425745788))),
        ("option_u64", "0136eece5eb03dc254", some(DecodedValue::U64(3958328028584329812))),
        ("option_bigint", "01000000050577f69535", some(big("23487485237"))),
        (
            "option_bigint_from_buffer",
            "010000001332333438373738343735383733343835323337",
            some(big("2348778475873485237")),
        ),
        (
            "option_bigint_from_biguint_plus",
            "010000000f39bf6e49095ff7dca078957ceb928e",
            some(big("299843598872398459348567275690758798")),
        ),
        (
            "option_bigint_from_biguint_minus",
            "010000000fc64091b6f6a008235f876a83146d72",
            some(big("-299843598872398459348567275690758798")),
        ),
        ("option_biguint", "010000000537952bd072", some(big_u("238725877874"))),
        (
            "option_biguint_from_buffer",
            "0100000015323338373438323734383237393235383737383734",
            some(big_u("238748274827925877874")),
        ),
        (
            "option_address",
            "01667fd274481cf5b07418b2fdc5d8baa6ae717239357f338cde99c2f612a96a9e",
            some(address(OWNER)),
        ),
        (
            "option_managed_buffer",
            "010000001574657374696e67206f757470757473207479706573",
            some("testing outputs types".into()),
        ),
        ("option_i32", "00", DecodedValue::absent()),
    ];
    for (endpoint, hex, expected) in cases {
        assert_eq!(decode(&decoder, endpoint, hex), expected, "{endpoint}");
    }

    let float = decode(
        &decoder,
        "test_float_option",
        "0100000012010a00000035000000028000000000000000",
    );
    assert_eq!(float.to_string(), "Some(2)");
    Ok(())
}

#[test]
fn test_options_of_nested_lists() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    let value = decode(
        &decoder,
        "option_list_list_list_i64",
        &format!("0100000002{LIST_LIST_LIST_I64_HEX}"),
    );
    assert_eq!(
        value.present().and_then(|v| v.as_list()).map(<[_]>::len),
        Some(2)
    );

    assert_eq!(
        decode(
            &decoder,
            "option_list_list_list_big_int",
            &format!("0100000002{LIST_LIST_LIST_BIG_INT_HEX}")
        ),
        some(list_list_list_big_int())
    );

    let tokens = decode(
        &decoder,
        "option_list_list_list_token",
        &format!("0100000002{LIST_LIST_LIST_TOKEN_HEX}"),
    );
    assert_eq!(
        tokens.to_string(),
        r#"Some([[["CHIPS-N89A", "KLV", "KFI"], ["TFT-786J", "SJA-LK9H", "QKU-7HH1"]], [["CHIPS-N89A", "KLV", "KFI"], ["TFT-786J", "SJA-LK9H", "QKU-7HH1"]]])"#
    );
    Ok(())
}

#[test]
fn test_tuples() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    let head = "0000000e373633343537383934333638393700000000000000000500af4a12b061e511ca9068af4c83e4918477e6c6ad6a9efffffffe84291d30";
    assert_eq!(
        decode(&decoder, "tuple", head),
        list([
            big("76345789436897"),
            address(CONTRACT),
            DecodedValue::I64(-6372647632),
        ])
    );
    assert_eq!(
        decode(
            &decoder,
            "tuple_nested",
            &format!("{head}490000000a68736475676668756973")
        ),
        list([
            big("76345789436897"),
            address(CONTRACT),
            DecodedValue::I64(-6372647632),
            list([DecodedValue::U8(73), "hsdugfhuis".into()]),
        ])
    );
    assert_eq!(
        decode(
            &decoder,
            "tuple_with_nested_list",
            "000000090106624c51203c773000000002000000036fab02760000001cffff9ca400000003fffffffe0001e308f1b3cfdc000000084458422d31593641"
        ),
        list([big_u("18906758096971659056"), list_list_i32(), "DXB-1Y6A".into()])
    );
    Ok(())
}

#[test]
fn test_struct() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    let value = decode(&decoder, "struct_test", STRUCT_HEX);
    let fields = value.as_struct().expect("struct value");
    assert_eq!(fields.name(), "TestStruct");
    assert_eq!(fields.len(), 16);

    let expected = [
        ("bool_field", DecodedValue::Bool(false)),
        ("i8_field", DecodedValue::I8(82)),
        ("i16_field", DecodedValue::I16(8482)),
        ("i32_field", DecodedValue::I32(425745788)),
        ("i64_field", DecodedValue::I64(3958328028584329812)),
        ("u8_field", DecodedValue::U8(82)),
        ("u16_field", DecodedValue::U16(8482)),
        ("u32_field", DecodedValue::U32(425745788)),
        ("u64_field", DecodedValue::U64(3958328028584329812)),
        ("mngd_buf_field", "testing outputs types".into()),
        ("token_field", "KLV".into()),
        ("address_field", address(OWNER)),
        ("biguint_field", big_u("23723672699978725877874")),
        ("bigint_field", big("7372987927357988018876673641787893775877874")),
        (
            "list_token",
            list(["KLV", "KFI", "KID-8G9A", "DXB-H88G", "CHIPS-N89A"]),
        ),
    ];
    for (name, value) in expected {
        assert_eq!(fields.get(name), Some(&value), "{name}");
    }
    match fields.get("bigfloat_field") {
        Some(DecodedValue::BigFloat(f)) => assert_eq!(f.to_f64(), 8.0 / 3.0),
        other => panic!("unexpected bigfloat_field {other:?}"),
    }

    // Field order follows the ABI declaration.
    assert_eq!(fields.field_names().next(), Some("bool_field"));
    assert_eq!(fields.field_names().last(), Some("list_token"));
    Ok(())
}

#[test]
fn test_list_and_option_of_struct() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    let two = decode(
        &decoder,
        "list_struct",
        &format!("{STRUCT_HEX}{STRUCT_HEX}"),
    );
    assert_eq!(two.as_list().map(<[_]>::len), Some(2));

    assert!(decode(&decoder, "option_struct", "00").is_absent());
    let present = decode(&decoder, "option_struct", &format!("01{STRUCT_HEX}"));
    assert_eq!(
        present.present().and_then(|v| v.as_struct()).and_then(|s| s.get("token_field")),
        Some(&DecodedValue::from("KLV"))
    );
    Ok(())
}

#[test]
fn test_lottery_winners() -> Result<()> {
    init_logger(false);
    let decoder = lottery_decoder()?;

    let winners = decode(&decoder, "getWinnersInfo", WINNERS_HEX);
    let winners = winners.as_list().expect("list of winners");
    assert_eq!(winners.len(), 9);

    let expected = [
        (11, "klv1yfj8fs5vgnd5t2d499z3jt6n8tl0a8zdhuj0enhpdhq92wtj4s0snj96jg", 250000000u64),
        (16, "klv1at6gv6pz6q8ulhvjgl548hnljdmpnstjqvm2tspadu5nnnnrhtxsj29zmr", 170000000),
        (2, "klv1at6gv6pz6q8ulhvjgl548hnljdmpnstjqvm2tspadu5nnnnrhtxsj29zmr", 20000000),
        (1, "klv1at6gv6pz6q8ulhvjgl548hnljdmpnstjqvm2tspadu5nnnnrhtxsj29zmr", 10000000),
        (1, "klv19lw8j3gnh4wk494ar3pkjfzzsk57nmvypnmdyjqzjm7zw9hd9acs6qdz6w", 10000000),
        (3, "klv1yfj8fs5vgnd5t2d499z3jt6n8tl0a8zdhuj0enhpdhq92wtj4s0snj96jg", 30000000),
        (2, "klv1gvqkkymgwnupakwykxcjc2cak3npy7m56l38v2t2dnmljkvjcw7sraj2ny", 30000000),
        (1, "klv1nuf4gurdwkhtdp8jd47758aa59lzvnr4jhxpah0vpwyk3sd7s5jqy6mut7", 10000000),
        (1, OWNER, 10000000),
    ];
    for (winner, (ticket, owner, prize)) in winners.iter().zip(expected) {
        let winner = winner.as_struct().expect("WinnerInfo");
        assert_eq!(winner.name(), "WinnerInfo");
        assert_eq!(
            winner.get("drawn_ticket_number"),
            Some(&DecodedValue::U32(ticket))
        );
        assert_eq!(winner.get("winner_address"), Some(&address(owner)));
        assert_eq!(
            winner.get("prize"),
            Some(&DecodedValue::BigUint(BigUint::from(prize)))
        );
    }
    Ok(())
}

#[test]
fn test_multiple_outputs() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    let value = decoder.decode_hex(
        "multi_value_nested_list_struct",
        &[
            STRUCT_HEX,
            "000000036fab02760000001cffff9ca400000003fffffffe0001e308f1b3cfdc",
            LIST_LIST_LIST_BIG_INT_HEX,
        ],
    )?;
    let outputs = value.as_list().expect("one value per output");
    assert_eq!(outputs.len(), 3);
    assert_eq!(
        outputs[0].as_struct().and_then(|s| s.get("u8_field")),
        Some(&DecodedValue::U8(82))
    );
    assert_eq!(outputs[1], list_list_i32());
    assert_eq!(outputs[2], list_list_list_big_int());

    // The trailing variadic output absorbs the remaining payloads.
    assert_eq!(
        decoder.decode_hex("count_and_tokens", &["03", "4b4c56", "4b4649", "4b49442d38473941"])?,
        list([
            DecodedValue::U32(3),
            "KLV".into(),
            "KFI".into(),
            "KID-8G9A".into()
        ])
    );
    Ok(())
}

#[test]
fn test_decode_errors() -> Result<()> {
    init_logger(false);
    let decoder = example_decoder()?;

    assert!(matches!(
        decoder.decode_hex("nope", &["00"]),
        Err(Error::EndpointNotFound(name)) if name == "nope"
    ));
    assert!(matches!(
        decoder.decode_hex("init", &["00"]),
        Err(Error::EndpointWithoutOutputs(_))
    ));

    let err = decoder.decode_hex("missing_type", &["00"]).unwrap_err();
    assert!(matches!(err.root(), Error::TypeNotFound(name) if name == "Unknown"));
    assert!(err.to_string().starts_with("endpoint `missing_type`"));

    let err = decoder.decode_hex("status", &["01"]).unwrap_err();
    assert!(matches!(err.root(), Error::UnsupportedType(name) if name == "Status"));

    let err = decoder
        .decode_hex("struct_test", &[&STRUCT_HEX[..150]])
        .unwrap_err();
    assert!(matches!(err.root(), Error::CursorExhausted { .. }));
    assert!(err.to_string().contains("field `address_field` of `TestStruct`"));

    let err = decoder
        .decode_hex(
            "multi_value_nested_list_struct",
            &[STRUCT_HEX, "00000000", "00000000", "00"],
        )
        .unwrap_err();
    assert!(matches!(
        err.root(),
        Error::UnexpectedPayload { index: 3, .. }
    ));

    let err = decoder.decode_hex("list_int32", &["0000000g"]).unwrap_err();
    assert!(matches!(err.root(), Error::InvalidHex(_)));
    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    init_logger(false);
    let decoder = lottery_decoder()?;

    let winners = decode(&decoder, "getWinnersInfo", WINNERS_HEX);
    let json = serde_json::to_value(&winners)?;
    assert_eq!(
        json[0],
        serde_json::json!({
            "drawn_ticket_number": 11,
            "winner_address": "klv1yfj8fs5vgnd5t2d499z3jt6n8tl0a8zdhuj0enhpdhq92wtj4s0snj96jg",
            "prize": "250000000"
        })
    );
    Ok(())
}
