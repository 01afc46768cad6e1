// CRC-8 with polynomial x^8 + x^2 + x^1 + x^0, used for frame headers.
const CRC8_TABLE: [u8; 256] = crc8_table();

// CRC-16 with polynomial x^16 + x^15 + x^2 + x^0, used for whole frames.
const CRC16_TABLE: [u16; 256] = crc16_table();

const fn crc8_table() -> [u8; 256] {
  let mut table = [0; 256];
  let mut i     = 0;

  while i < 256 {
    let mut crc = i as u8;
    let mut bit = 0;

    while bit < 8 {
      crc = if crc & 0x80 != 0 { (crc << 1) ^ 0x07 } else { crc << 1 };
      bit += 1;
    }

    table[i] = crc;
    i       += 1;
  }

  table
}

const fn crc16_table() -> [u16; 256] {
  let mut table = [0; 256];
  let mut i     = 0;

  while i < 256 {
    let mut crc = (i as u16) << 8;
    let mut bit = 0;

    while bit < 8 {
      crc = if crc & 0x8000 != 0 { (crc << 1) ^ 0x8005 } else { crc << 1 };
      bit += 1;
    }

    table[i] = crc;
    i       += 1;
  }

  table
}

pub fn crc8(bytes: &[u8]) -> u8 {
  bytes.iter().fold(0, |crc, byte| CRC8_TABLE[(crc ^ byte) as usize])
}

pub fn crc16(bytes: &[u8]) -> u16 {
  bytes.iter().fold(0, |crc, byte| {
    let index = ((crc >> 8) as u8 ^ byte) as usize;

    (crc << 8) ^ CRC16_TABLE[index]
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_crc8() {
    let inputs = [&b"123456789"[..], &b""[..]];

    assert_eq!(crc8(inputs[0]), 0xf4);
    assert_eq!(crc8(inputs[1]), 0x00);
  }

  #[test]
  fn test_crc16() {
    let inputs = [&b"123456789"[..], &b""[..]];

    assert_eq!(crc16(inputs[0]), 0xfee8);
    assert_eq!(crc16(inputs[1]), 0x0000);
  }

  #[test]
  fn test_appended_crc_checks_to_zero() {
    let header = b"\xff\xf8\x69\x18\x00\x00";
    let mut bytes = header.to_vec();

    bytes.push(crc8(header));

    assert_eq!(crc8(&bytes), 0);

    let crc = crc16(&bytes);

    bytes.push((crc >> 8) as u8);
    bytes.push(crc as u8);

    assert_eq!(crc16(&bytes), 0);
  }
}
