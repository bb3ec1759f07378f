use crate::error::Error;
use crate::image::{DataValue, ImageEntry};
use crate::EepromImage;

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    address: String,
    encoding: String,
    value: String,
}

/// Parse CSV content from a string into an [`EepromImage`].
pub(crate) fn parse_csv(content: &str) -> Result<EepromImage, Error> {
    let mut image = EepromImage { entries: vec![] };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        image.entries.push(parse_row(row)?);
    }

    Ok(image)
}

fn parse_row(row: CsvRow) -> Result<ImageEntry, Error> {
    let address = parse_number::<u16>(&row.address)
        .map_err(|e| Error::InvalidAddress(format!("{}: {}", row.address, e)))?;
    let value = parse_value(&row.value, &row.encoding)?;
    Ok(ImageEntry { address, value })
}

/// Decimal, or hexadecimal with a `0x` prefix.
fn parse_number<T: Number>(s: &str) -> Result<T, std::num::ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        T::from_str_radix(hex, 16)
    } else {
        T::from_str_radix(s, 10)
    }
}

trait Number: Sized {
    fn from_str_radix(s: &str, radix: u32) -> Result<Self, std::num::ParseIntError>;
}

macro_rules! impl_number {
    ($($ty:ty),*) => {
        $(impl Number for $ty {
            fn from_str_radix(s: &str, radix: u32) -> Result<Self, std::num::ParseIntError> {
                <$ty>::from_str_radix(s, radix)
            }
        })*
    };
}

impl_number!(u8, u16, u32);

macro_rules! parse_numeric {
    ($value:expr, $ty:ty, $variant:ident) => {
        parse_number::<$ty>($value)
            .map(DataValue::$variant)
            .map_err(|e| Error::InvalidValue(format!("invalid {} value: {}", stringify!($ty), e)))
    };
}

fn parse_value(value: &str, encoding: &str) -> Result<DataValue, Error> {
    match encoding {
        "u8" => parse_numeric!(value, u8, U8),
        "u16" => parse_numeric!(value, u16, U16),
        "u32" => parse_numeric!(value, u32, U32),
        "hex2bin" => {
            let bytes = hex::decode(value)?;
            Ok(DataValue::Binary(bytes))
        }
        _ => Err(Error::InvalidEncoding(encoding.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(parse_number::<u16>("42"), Ok(42));
        assert_eq!(parse_number::<u16>("0x1F"), Ok(0x1F));
        assert_eq!(parse_number::<u8>("0XfF"), Ok(0xFF));
        assert!(parse_number::<u8>("256").is_err());
        assert!(parse_number::<u32>("0x").is_err());
    }

    #[test]
    fn rows() {
        let image = parse_csv(
            "address,encoding,value\n\
             0,u8,7\n\
             0x10, u16, 0xBEEF\n\
             32,u32,4294967295\n\
             64,hex2bin,00112233\n",
        )
        .unwrap();

        assert_eq!(
            image.entries,
            vec![
                ImageEntry {
                    address: 0,
                    value: DataValue::U8(7)
                },
                ImageEntry {
                    address: 0x10,
                    value: DataValue::U16(0xBEEF)
                },
                ImageEntry {
                    address: 32,
                    value: DataValue::U32(u32::MAX)
                },
                ImageEntry {
                    address: 64,
                    value: DataValue::Binary(vec![0x00, 0x11, 0x22, 0x33])
                },
            ]
        );
    }

    #[test]
    fn invalid_rows() {
        assert!(matches!(
            parse_csv("address,encoding,value\n0,i8,1\n"),
            Err(Error::InvalidEncoding(_))
        ));
        assert!(matches!(
            parse_csv("address,encoding,value\n0,u8,300\n"),
            Err(Error::InvalidValue(_))
        ));
        assert!(matches!(
            parse_csv("address,encoding,value\n70000,u8,1\n"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            parse_csv("address,encoding,value\n0,hex2bin,abc\n"),
            Err(Error::HexError(_))
        ));
    }
}
