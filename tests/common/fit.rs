// Minimal FIT encoder for test fixtures: `record` messages plus an optional `session`

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z)
pub const FIT_EPOCH_OFFSET: i64 = 631_065_600;

/// `sport` enum value for cycling in the FIT profile
pub const SPORT_CYCLING: u8 = 2;

const HEADER_SIZE: u8 = 14;
const PROTOCOL_VERSION: u8 = 0x10;
const PROFILE_VERSION: u16 = 2093;
const RECORD_MESG_NUM: u16 = 20;
const SESSION_MESG_NUM: u16 = 18;
const RECORD_LOCAL_TYPE: u8 = 0;
const SESSION_LOCAL_TYPE: u8 = 1;

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// Seconds since the FIT epoch
    pub timestamp: u32,
    pub heart_rate: u8,
    pub power: u16,
    /// mm/s
    pub speed: u16,
    /// cm
    pub distance: u32,
    /// Cumulative kcal
    pub calories: u16,
}

/// Three one-second samples starting at 2021-09-08T01:46:40Z
pub fn sample_ride() -> Vec<Sample> {
    vec![
        Sample {
            timestamp: 1_000_000_000,
            heart_rate: 120,
            power: 180,
            speed: 8250,
            distance: 0,
            calories: 60,
        },
        Sample {
            timestamp: 1_000_000_001,
            heart_rate: 125,
            power: 210,
            speed: 8500,
            distance: 850,
            calories: 70,
        },
        Sample {
            timestamp: 1_000_000_002,
            heart_rate: 131,
            power: 240,
            speed: 8750,
            distance: 1725,
            calories: 77,
        },
    ]
}

/// `sample_ride` followed by a cycling session summary
pub fn sample_ride_file() -> Vec<u8> {
    build_fit_file(&sample_ride(), Some(SPORT_CYCLING))
}

pub fn build_fit_file(samples: &[Sample], sport: Option<u8>) -> Vec<u8> {
    let mut data = Vec::new();

    write_definition(
        &mut data,
        RECORD_LOCAL_TYPE,
        RECORD_MESG_NUM,
        &[
            (253, 4, 0x86), // timestamp
            (3, 1, 0x02),   // heart_rate
            (7, 2, 0x84),   // power
            (6, 2, 0x84),   // speed
            (5, 4, 0x86),   // distance
            (33, 2, 0x84),  // calories
        ],
    );

    for sample in samples {
        data.push(RECORD_LOCAL_TYPE);
        data.extend_from_slice(&sample.timestamp.to_le_bytes());
        data.push(sample.heart_rate);
        data.extend_from_slice(&sample.power.to_le_bytes());
        data.extend_from_slice(&sample.speed.to_le_bytes());
        data.extend_from_slice(&sample.distance.to_le_bytes());
        data.extend_from_slice(&sample.calories.to_le_bytes());
    }

    if let Some(sport) = sport {
        write_definition(&mut data, SESSION_LOCAL_TYPE, SESSION_MESG_NUM, &[(5, 1, 0x00)]);
        data.push(SESSION_LOCAL_TYPE);
        data.push(sport);
    }

    let mut file = Vec::with_capacity(HEADER_SIZE as usize + data.len() + 2);
    file.push(HEADER_SIZE);
    file.push(PROTOCOL_VERSION);
    file.extend_from_slice(&PROFILE_VERSION.to_le_bytes());
    file.extend_from_slice(&(data.len() as u32).to_le_bytes());
    file.extend_from_slice(b".FIT");
    let header_crc = fit_crc(&file);
    file.extend_from_slice(&header_crc.to_le_bytes());

    file.extend_from_slice(&data);
    let file_crc = fit_crc(&file);
    file.extend_from_slice(&file_crc.to_le_bytes());
    file
}

/// Little-endian definition message: (field number, size, base type) per field
fn write_definition(data: &mut Vec<u8>, local_type: u8, global_mesg_num: u16, fields: &[(u8, u8, u8)]) {
    data.push(0x40 | local_type);
    data.push(0); // reserved
    data.push(0); // little-endian
    data.extend_from_slice(&global_mesg_num.to_le_bytes());
    data.push(fields.len() as u8);
    for &(num, size, base_type) in fields {
        data.extend_from_slice(&[num, size, base_type]);
    }
}

fn fit_crc(bytes: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in bytes {
        let mut tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ CRC_TABLE[(byte & 0xF) as usize];

        tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ CRC_TABLE[((byte >> 4) & 0xF) as usize];
    }
    crc
}
