//! Field-level text decoding for Comprehension-TLV values
//!
//! Each routine renders one SIM Toolkit field into the line of text shown
//! next to the tag node. The name tables follow ETSI TS 102 223; entries
//! are looked up per byte and unknown codes always degrade to a readable
//! fallback instead of an error.

use crate::hexutil;

fn command_name_of(code: u8) -> Option<&'static str> {
    let name = match code {
        0x01 => "REFRESH",
        0x02 => "MORE TIME",
        0x03 => "POLL INTERVAL",
        0x04 => "POLLING OFF",
        0x05 => "SET UP EVENT LIST",
        0x10 => "SET UP CALL",
        0x11 => "Reserved for GSM/3G (SEND SS)",
        0x12 => "Reserved for GSM/3G (SEND USSD)",
        0x13 => "SEND SHORT MESSAGE",
        0x14 => "SEND DTMF",
        0x15 => "LAUNCH BROWSER",
        0x16 => "Reserved for 3GPP (GEOGRAPHICAL LOCATION REQUEST)",
        0x20 => "PLAY TONE",
        0x21 => "DISPLAY TEXT",
        0x22 => "GET INKEY",
        0x23 => "GET INPUT",
        0x24 => "SELECT ITEM",
        0x25 => "SET UP MENU",
        0x26 => "PROVIDE LOCAL INFORMATION",
        0x27 => "TIMER MANAGEMENT",
        0x28 => "SET UP IDLE MODE TEXT",
        0x30 => "PERFORM CARD APDU",
        0x31 => "POWER ON CARD",
        0x32 => "POWER OFF CARD",
        0x33 => "GET READER STATUS",
        0x34 => "RUN AT COMMAND",
        0x35 => "LANGUAGE NOTIFICATION",
        0x40 => "OPEN CHANNEL",
        0x41 => "CLOSE CHANNEL",
        0x42 => "RECEIVE DATA",
        0x43 => "SEND DATA",
        0x44 => "GET CHANNEL STATUS",
        0x45 => "SERVICE SEARCH",
        0x46 => "GET SERVICE INFORMATION",
        0x47 => "DECLARE SERVICE",
        0x50 => "SET FRAMES",
        0x51 => "GET FRAMES STATUS",
        0x60 => "(RETRIEVE MULTIMEDIA MESSAGE)",
        0x61 => "(SUBMIT MULTIMEDIA MESSAGE)",
        0x62 => "DISPLAY MULTIMEDIA MESSAGE",
        0x70 => "ACTIVATE",
        0x71 => "CONTACTLESS STATE CHANGED",
        0x73 => "ENCAPSULATED SESSION CONTROL",
        0x74 => "Void",
        0x75 => "Reserved for 3GPP (for future usage)",
        0x76 => "Reserved for 3GPP (for future usage)",
        0x77 => "Reserved for 3GPP (for future usage)",
        0x78 => "Reserved for 3GPP (for future usage)",
        0x79 => "LSI COMMAND",
        0x81 => "End of the proactive UICC session",
        _ => return None,
    };
    Some(name)
}

fn qualifier_text(command: u8, qualifier: u8) -> String {
    let known: Option<&'static str> = match command {
        0x01 => match qualifier {
            0x00 => Some("NAA Initialization and Full File Change Notification"),
            0x01 => Some("File Change Notification"),
            0x02 => Some("NAA Initialization and File Change Notification"),
            0x03 => Some("NAA Initialization"),
            0x04 => Some("UICC Reset"),
            0x05 => Some("NAA Application Reset"),
            0x06 => Some("NAA Session Reset"),
            0x07 => Some("Reserved by 3GPP"),
            0x08 => Some("Reserved by 3GPP"),
            0x09 => Some("eUICC Profile State Change"),
            0x0A => Some("Application Update"),
            _ => None,
        },
        0x10 => match qualifier {
            0x00 => Some("Set up call, not busy"),
            0x01 => Some("Set up call, not busy, with redial"),
            0x02 => Some("Set up call, put others on hold"),
            0x03 => Some("Set up call, put others on hold, with redial"),
            0x04 => Some("Set up call, disconnect others"),
            0x05 => Some("Set up call, disconnect others, with redial"),
            _ => None,
        },
        0x13 => match qualifier {
            0x00 => Some("Packing not required"),
            0x01 => Some("SMS packing required"),
            _ => None,
        },
        0x20 => match qualifier {
            0x00 => Some("Use of vibrate alert is up to the terminal"),
            0x01 => Some("Vibrate alert with the tone"),
            _ => None,
        },
        0x21 | 0x62 => match qualifier {
            0x00 => Some("Normal priority"),
            0x01 => Some("High priority"),
            0x80 => Some("Clear message after a delay"),
            0x81 => Some("Wait for user to clear message"),
            _ => None,
        },
        0x22 => match qualifier {
            0x00 => Some("Digits only"),
            0x01 => Some("Alphabet set"),
            0x02 => Some("SMS default alphabet"),
            0x03 => Some("UCS2 alphabet"),
            0x04 => Some("Character sets enabled"),
            0x05 => Some("Character sets disabled, Yes/No response"),
            0x08 => Some("No help information"),
            0x09 => Some("Help information available"),
            _ => None,
        },
        0x23 => match qualifier {
            0x00 => Some("Digits only"),
            0x01 => Some("Alphabet set"),
            0x02 => Some("SMS default alphabet"),
            0x03 => Some("UCS2 alphabet"),
            0x04 => Some("Echo user input"),
            0x05 => Some("User input not revealed"),
            0x08 => Some("No help information"),
            0x09 => Some("Help information available"),
            _ => None,
        },
        0x24 => match qualifier {
            0x00 => Some("Presentation type not specified"),
            0x01 => Some("Presentation type specified"),
            0x02 => Some("Choice of data values"),
            0x03 => Some("Choice of navigation options"),
            0x08 => Some("No help information"),
            0x09 => Some("Help information available"),
            _ => None,
        },
        0x25 => match qualifier {
            0x00 => Some("No selection preference"),
            0x01 => Some("Selection using soft key preferred"),
            0x08 => Some("No help information"),
            0x09 => Some("Help information available"),
            _ => None,
        },
        0x26 => match qualifier {
            0x00 => Some("Location Information"),
            0x01 => Some("IMEI of the terminal"),
            0x02 => Some("Network Measurement results"),
            0x03 => Some("Date, time and time zone"),
            0x04 => Some("Language setting"),
            0x05 => Some("Reserved for GSM"),
            0x06 => Some("Access Technology"),
            0x07 => Some("ESN of the terminal"),
            0x08 => Some("IMEISV of the terminal"),
            0x09 => Some("Search Mode"),
            0x0A => Some("Charge State of the Battery"),
            0x0B => Some("MEID of the terminal"),
            0x0C => Some("Reserved for 3GPP"),
            0x0D => Some("Broadcast Network information"),
            0x0E => Some("Multiple Access Technologies"),
            0x0F => Some("Location Information for multiple access"),
            0x10 => Some("Network Measurement results for multiple access"),
            0x1A => Some("Supported Radio Access Technologies"),
            _ => None,
        },
        0x27 => match qualifier {
            0x00 => Some("Start"),
            0x01 => Some("Deactivate"),
            0x10 => Some("Get current value"),
            _ => None,
        },
        0x33 => match qualifier {
            0x00 => Some("Card reader status"),
            0x01 => Some("Card reader identifier"),
            _ => None,
        },
        0x40 => match qualifier {
            0x00 => Some("On demand link establishment"),
            0x01 => Some("Immediate link establishment"),
            0x02 => Some("No automatic reconnection"),
            0x03 => Some("Automatic reconnection"),
            0x04 => Some("No background mode"),
            0x05 => Some("Immediate link establishment in background mode"),
            0x06 => Some("No DNS server address requested"),
            0x07 => Some("DNS server address requested"),
            _ => None,
        },
        0x41 => match qualifier {
            0x00 => Some("No indication"),
            0x01 => Some("Indication for next CAT command"),
            _ => None,
        },
        0x43 => match qualifier {
            0x00 => Some("Store data in Tx buffer"),
            0x01 => Some("Send data immediately"),
            _ => None,
        },
        0x73 => match qualifier {
            0x00 => Some("End encapsulated command session"),
            0x01 => Some("Request Master SA setup"),
            0x02 => Some("Request Connection SA setup"),
            0x03 => Some("Request Secure Channel Start"),
            0x04 => Some("Close Master and Connection SA"),
            _ => None,
        },
        0x79 => match qualifier {
            0x00 => Some("Proactive Session Request"),
            0x01 => Some("UICC Platform Reset"),
            _ => None,
        },
        _ => None,
    };
    match known {
        Some(text) => text.to_string(),
        None => format!("Qualifier not defined: {:02X}", qualifier),
    }
}

/// Name of the command carried by a Command details value, without the
/// qualifier description. Used for the message title.
pub fn command_name(value: &[u8]) -> Option<&'static str> {
    value.get(1).copied().and_then(command_name_of)
}

/// Command details: command-number, command-type, qualifier.
pub fn command_details(value: &[u8]) -> String {
    if value.len() < 2 {
        return "Unknown Command".to_string();
    }
    let command = value[1];
    let name = command_name_of(command).unwrap_or("Unknown Command");
    match value.get(2) {
        Some(&q) => format!("{} - {}", name, qualifier_text(command, q)),
        None => name.to_string(),
    }
}

fn device_name_of(code: u8) -> Option<String> {
    let fixed = match code {
        0x01 => Some("Keypad"),
        0x02 => Some("Display"),
        0x03 => Some("Earpiece"),
        0x81 => Some("UICC"),
        0x82 => Some("Terminal"),
        0x83 => Some("Network"),
        _ => None,
    };
    if let Some(name) = fixed {
        return Some(name.to_string());
    }
    match code {
        0x10..=0x17 => Some(format!("Additional Card Reader {}", code - 0x10)),
        0x21..=0x27 => Some(format!("Channel {}", code - 0x20)),
        0x31..=0x3F => Some(format!("eCAT client {:X}", code - 0x30)),
        _ => None,
    }
}

/// Device identities: source and destination byte pair.
pub fn device_identities(value: &[u8]) -> String {
    if value.len() < 2 {
        return "Unknown device identities".to_string();
    }
    let src = device_name_of(value[0]).unwrap_or_else(|| "Unknown Source Device".to_string());
    let dst = device_name_of(value[1]).unwrap_or_else(|| "Unknown Destination Device".to_string());
    format!("{} -> {}", src, dst)
}

fn general_result_of(code: u8) -> Option<&'static str> {
    let name = match code {
        0x00 => "Command performed successfully",
        0x01 => "Command performed with partial comprehension",
        0x02 => "Command performed, with missing information",
        0x03 => "REFRESH performed with additional EFs read",
        0x04 => "Command performed successfully, but requested icon could not be displayed",
        0x05 => "Command performed, but modified by call control by NAA",
        0x06 => "Command performed successfully, limited service",
        0x07 => "Command performed with modification",
        0x08 => "REFRESH performed but indicated NAA was not active",
        0x09 => "Command performed successfully, tone not played",
        0x10 => "Proactive UICC session terminated by the user",
        0x11 => "Backward move in the proactive UICC session requested by the user",
        0x12 => "No response from user",
        0x13 => "Help information required by the user",
        0x14 => "Reserved for GSM/3G",
        0x15 => "Reserved for 3GPP (for future usage)",
        0x16 => "Reserved for 3GPP (for future usage)",
        0x20 => "Terminal currently unable to process command",
        0x21 => "Network currently unable to process command",
        0x22 => "User did not accept the proactive command",
        0x23 => "User cleared down call before connection or network release",
        0x24 => "Action in contradiction with the current timer state",
        0x25 => "Interaction with call control by NAA, temporary problem",
        0x26 => "Launch browser generic error",
        0x27 => "MMS temporary problem",
        0x28 => "Reserved for 3GPP (for future usage)",
        0x29 => "Reserved for 3GPP (for future usage)",
        0x30 => "Command beyond terminal's capabilities",
        0x31 => "Command type not understood by terminal",
        0x32 => "Command data not understood by terminal",
        0x33 => "Command number not known by terminal",
        0x36 => "Error, required values are missing",
        0x38 => "MultipleCard commands error",
        0x39 => "Interaction with call control by NAA, permanent problem",
        0x3A => "Bearer Independent Protocol error",
        0x3B => "Access Technology unable to process command",
        0x3C => "Frames error",
        0x3D => "MMS Error",
        _ => return None,
    };
    Some(name)
}

fn additional_info_of(general: u8, code: u8) -> Option<&'static str> {
    let name = match (general, code) {
        (0x20, 0x00) => "No specific cause can be given",
        (0x20, 0x01) => "Screen is busy",
        (0x20, 0x02) => "Terminal currently busy on call",
        (0x20, 0x04) => "No service",
        (0x20, 0x05) => "Access control class bar",
        (0x20, 0x06) => "Radio resource not granted",
        (0x20, 0x07) => "Not in speech call",
        (0x20, 0x09) => "Terminal currently busy on SEND DTMF command",
        (0x20, 0x0A) => "No NAA active",
        (0x21, 0x00) => "No specific cause can be given",
        (0x38, 0x00) => "No specific cause can be given",
        (0x38, 0x01) => "Card reader removed or not present",
        (0x38, 0x02) => "Card removed or not present",
        (0x38, 0x03) => "Card reader busy",
        (0x38, 0x04) => "Card powered off",
        (0x38, 0x05) => "C-APDU format error",
        (0x38, 0x06) => "Mute card",
        (0x38, 0x07) => "Transmission error",
        (0x38, 0x08) => "Protocol not supported",
        (0x38, 0x09) => "Specified reader not valid",
        (0x39, 0x00) => "No specific cause can be given",
        (0x39, 0x01) => "Action not allowed",
        (0x39, 0x02) => "The type of request has changed",
        (0x26, 0x00) => "No specific cause can be given",
        (0x26, 0x01) => "Bearer unavailable",
        (0x26, 0x02) => "Browser unavailable",
        (0x26, 0x03) => "Terminal unable to read the provisioning data",
        (0x26, 0x04) => "Default URL unavailable",
        (0x3A, 0x00) => "No specific cause can be given",
        (0x3A, 0x01) => "No channel available",
        (0x3A, 0x02) => "Channel closed",
        (0x3A, 0x03) => "Channel identifier not valid",
        (0x3A, 0x04) => "Requested buffer size not available",
        (0x3A, 0x05) => "Security error (unsuccessful authentication)",
        (0x3A, 0x06) => "Requested UICC/terminal interface transport level not available",
        (0x3A, 0x07) => "Remote device is not reachable",
        (0x3A, 0x08) => "Service error (service not available on remote device)",
        (0x3A, 0x09) => "Service identifier unknown",
        (0x3A, 0x10) => "Port not available",
        (0x3A, 0x11) => "Launch parameters missing or incorrect",
        (0x3A, 0x12) => "Application launch failed",
        (0x3C, 0x00) => "No specific cause can be given",
        (0x3C, 0x01) => "Frame identifier is not valid",
        (0x3C, 0x02) => "Number of frames beyond the terminal's capabilities",
        (0x3C, 0x03) => "No Frame defined",
        (0x3C, 0x04) => "Requested size not supported",
        (0x3C, 0x05) => "Default Active Frame is not valid",
        (0x3D, 0x00) => "No specific cause can be given",
        _ => return None,
    };
    Some(name)
}

/// Result: general result code plus optional additional info.
pub fn result_details(value: &[u8]) -> String {
    let Some(&general) = value.first() else {
        return "Unknown General Result".to_string();
    };
    let desc = general_result_of(general).unwrap_or("Unknown General Result");
    match value.get(1) {
        Some(&ai) => {
            let extra = additional_info_of(general, ai).unwrap_or("Unknown Additional Info");
            format!("Result: {}, Additional Info: {}", desc, extra)
        }
        None => format!("Result: {}", desc),
    }
}

/// Duration: time unit code plus interval.
pub fn duration(value: &[u8]) -> String {
    if value.len() != 2 {
        return format!("Invalid duration value: {}", hexutil::to_hex(value));
    }
    let interval = value[1] as u32;
    if interval == 0 {
        return format!("Invalid duration: {}", hexutil::to_hex(value));
    }
    match value[0] {
        0x00 => format!("{} minutes", interval),
        0x01 => format!("{} seconds", interval),
        0x02 => format!("{:.1} seconds", interval as f64 / 10.0),
        _ => format!("Invalid duration: {}", hexutil::to_hex(value)),
    }
}

/// Address: TON/NPI byte plus swapped-BCD dialling number.
pub fn address(value: &[u8]) -> String {
    let Some(&ton_npi) = value.first() else {
        return "Invalid address tag".to_string();
    };
    let ton = match (ton_npi >> 4) & 0x07 {
        0b000 => "Unknown",
        0b001 => "International Number",
        0b010 => "National Number",
        0b011 => "Network Specific Number",
        _ => "Reserved/Access Technology Specific",
    };
    let npi = match ton_npi & 0x0F {
        0b0000 => "Unknown",
        0b0001 => "ISDN/telephony numbering plan (E.164/E.163)",
        0b0011 => "Data numbering plan (X.121)",
        0b0100 => "Telex numbering plan (F.69)",
        0b1001 => "Private numbering plan",
        0b1111 => "Reserved for extension",
        _ => "Reserved/Access Technology Specific",
    };
    let dialling = hexutil::nibble_swap(&value[1..]);
    format!("TON: {}, NPI: {}, Dialling Number: {}", ton, npi, dialling)
}

/// Location info: reordered MCCMNC, then TAC and Cell ID framed by length.
pub fn location_info(value: &[u8]) -> String {
    let h = hexutil::to_hex(value);
    if h.len() < 6 {
        return "Location info length error".to_string();
    }
    let m: Vec<char> = h[..6].chars().collect();
    let mccmnc: String = [m[1], m[0], m[3], m[5], m[4], m[2]].iter().collect();
    let (tac, cell_id) = match h.len() {
        22 => (&h[6..12], &h[12..]),
        18 => (&h[6..10], &h[10..]),
        _ => {
            return format!("Invalid location info length: {} bytes", h.len() / 2);
        }
    };
    format!("MCCMNC: {}, TAC: {}, CELL ID: {}", mccmnc, tac, cell_id)
}

/// IMEI: nibble swap of every byte.
pub fn imei(value: &[u8]) -> String {
    hexutil::nibble_swap(value)
}

fn event_name_of(code: u8) -> Option<&'static str> {
    let name = match code {
        0x00 => "MT call",
        0x01 => "Call connected",
        0x02 => "Call disconnected",
        0x03 => "Location status",
        0x04 => "User activity",
        0x05 => "Idle screen available",
        0x06 => "Card reader status",
        0x07 => "Language selection",
        0x08 => "Browser termination",
        0x09 => "Data available",
        0x0A => "Channel status",
        0x0B => "Access Technology Change (single access technology)",
        0x0C => "Display parameters changed",
        0x0D => "Local connection",
        0x0E => "Network Search Mode Change",
        0x0F => "Browsing status",
        0x10 => "Frames Information Change",
        0x11 => "(I-)WLAN Access Status",
        0x12 => "Network Rejection",
        0x13 => "HCI connectivity event",
        0x14 => "Access Technology Change (multiple access technologies)",
        0x15 => "CSG cell selection",
        0x16 => "Contactless state request",
        0x17 => "IMS Registration",
        0x18 => "Incoming IMS data",
        0x19 => "Profile Container",
        0x1B => "Secured Profile Container",
        0x1C => "Poll Interval Negotiation",
        0x1D => "Data Connection Status Change",
        0x1E => "CAG cell selection",
        _ => return None,
    };
    Some(name)
}

/// Event list: one-byte codes, comma joined.
pub fn event_list(value: &[u8]) -> String {
    value
        .iter()
        .map(|&b| {
            event_name_of(b)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Unknown Event ({:02X})", b))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn access_technology_of(code: u8) -> Option<&'static str> {
    let name = match code {
        0x00 => "GSM",
        0x01 => "TIA/EIA-553",
        0x02 => "TIA/EIA-136-270",
        0x03 => "UTRAN",
        0x04 => "TETRA",
        0x05 => "TIA/EIA-95-B",
        0x06 => "cdma2000 1x (TIA-2000.2)",
        0x07 => "cdma2000 HRPD (TIA-856)",
        0x08 => "E-UTRAN",
        0x09 => "eHRPD",
        0x0A => "3GPP NG-RAN",
        0x0B => "3GPP Satellite NG-RAN",
        0x0C => "3GPP Satellite E-UTRAN",
        _ => return None,
    };
    Some(name)
}

/// Access technology list, comma joined.
pub fn access_technology(value: &[u8]) -> String {
    value
        .iter()
        .map(|&b| access_technology_of(b).unwrap_or("Unknown Technology").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Channel status: channel id and BIP link state, plus further info.
pub fn channel_status(value: &[u8]) -> String {
    if value.len() < 2 {
        return "Invalid channel status".to_string();
    }
    let channel_id = value[0] & 0x07;
    let established = if value[0] & 0x80 != 0 {
        "BIP channel established"
    } else {
        "BIP channel not established"
    };
    let further = match value[1] {
        0x00 => "No further info can be given",
        0x05 => "Link dropped (network failure or user cancellation)",
        _ => "",
    };
    format!("Channel ID: {}, {}, {}", channel_id, established, further)
}

fn bearer_type_of(code: u8) -> Option<&'static str> {
    let name = match code {
        0x01 => "CSD",
        0x02 => "GPRS / UTRAN packet service / E-UTRAN / Satellite E-UTRAN / NG-RAN / Satellite NG-RAN",
        0x03 => "Default bearer for requested transport layer",
        0x04 => "Local link technology independent",
        0x05 => "Bluetooth®",
        0x06 => "IrDA",
        0x07 => "RS232",
        0x08 => "cdma2000 packet data service",
        0x09 => "UTRAN packet service with extended parameters / HSDPA / E-UTRAN / Satellite E-UTRAN / NG-RAN / Satellite NG-RAN",
        0x0A => "(I-)WLAN",
        0x0B => "E-UTRAN / Satellite E-UTRAN / NG-RAN / Satellite NG-RAN / mapped UTRAN packet service",
        0x0C => "NG-RAN / Satellite NG-RAN",
        _ => return None,
    };
    Some(name)
}

/// Bearer description: type byte plus raw parameters.
pub fn bearer_description(value: &[u8]) -> String {
    let Some(&bearer_type) = value.first() else {
        return "Invalid bearer description".to_string();
    };
    let desc = bearer_type_of(bearer_type).unwrap_or("Unknown Bearer Type");
    format!(
        "Bearer type: {}, Bearer parameters: {}",
        desc,
        hexutil::to_hex(&value[1..])
    )
}

/// Data destination address: IPv4 dotted or IPv6 colon groups.
pub fn dest_address(value: &[u8]) -> String {
    match value.first() {
        Some(0x21) => {
            let octets: Vec<String> = value[1..].iter().map(|b| b.to_string()).collect();
            format!("IPV4: {}", octets.join("."))
        }
        Some(0x57) => {
            let groups: Vec<String> = value[1..]
                .chunks(2)
                .map(hexutil::to_hex)
                .collect();
            format!("IPV6: {}", groups.join(":"))
        }
        _ => "Unknown IP type".to_string(),
    }
}

/// Timer identifier: timers 1..8, everything else reserved.
pub fn timer_identifier(value: &[u8]) -> String {
    if value.len() != 1 {
        return format!("Raw value: {}", hexutil::to_hex(value));
    }
    match value[0] {
        n @ 0x01..=0x08 => format!("Timer {}", n),
        _ => "Reserved".to_string(),
    }
}

/// Timer value rendered as `HH:MM:SS`.
pub fn timer_value(value: &[u8]) -> String {
    if value.len() < 3 {
        return hexutil::to_hex(value);
    }
    format!("{:02X}:{:02X}:{:02X}", value[0], value[1], value[2])
}

/// UICC/terminal interface transport: protocol type plus port number.
pub fn transport_protocol(value: &[u8]) -> String {
    let Some(&protocol_type) = value.first() else {
        return "Unknown protocol type".to_string();
    };
    let protocol = match protocol_type {
        0x01 => "UDP, UICC in client mode, remote connection".to_string(),
        0x02 => "TCP, UICC in client mode, remote connection".to_string(),
        0x03 => "TCP, UICC in server mode".to_string(),
        0x04 => "UDP, UICC in client mode, local connection".to_string(),
        0x05 => "TCP, UICC in client mode, local connection".to_string(),
        0x06 => "direct communication channel".to_string(),
        other => format!("Unknown protocol type: {:02X}", other),
    };
    let port = hexutil::be_uint(&value[1..]);
    format!("Transport protocol type: {}, port: {}", protocol, port)
}

/// Network Access Name: length-prefixed label as ASCII text.
pub fn network_access_name(value: &[u8]) -> String {
    if value.len() < 2 {
        return hexutil::to_hex(value);
    }
    match std::str::from_utf8(&value[1..]) {
        Ok(s) if s.chars().all(|c| !c.is_control()) => s.to_string(),
        _ => hexutil::to_hex(value),
    }
}

/// MCCMNC with trailing TAC, used by the network-information field.
pub fn mccmnc_with_tac(value: &[u8]) -> String {
    let h = hexutil::to_hex(value);
    if h.len() < 6 {
        return h;
    }
    let m: Vec<char> = h[..6].chars().collect();
    let mccmnc: String = [m[1], m[0], m[3], m[5], m[4], m[2]].iter().collect();
    format!("{}, TAC:{}", mccmnc, &h[6..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_details_display_text() {
        let v = hex::decode("012100").unwrap();
        assert_eq!(command_details(&v), "DISPLAY TEXT - Normal priority");
        assert_eq!(command_name(&v), Some("DISPLAY TEXT"));
    }

    #[test]
    fn test_command_details_unknown_qualifier() {
        let v = hex::decode("0121FF").unwrap();
        assert_eq!(
            command_details(&v),
            "DISPLAY TEXT - Qualifier not defined: FF"
        );
    }

    #[test]
    fn test_device_identities() {
        let v = hex::decode("8281").unwrap();
        assert_eq!(device_identities(&v), "Terminal -> UICC");
        let v = hex::decode("2483").unwrap();
        assert_eq!(device_identities(&v), "Channel 4 -> Network");
    }

    #[test]
    fn test_result_with_additional_info() {
        let v = hex::decode("2001").unwrap();
        assert_eq!(
            result_details(&v),
            "Result: Terminal currently unable to process command, Additional Info: Screen is busy"
        );
        let v = hex::decode("00").unwrap();
        assert_eq!(result_details(&v), "Result: Command performed successfully");
    }

    #[test]
    fn test_duration_tenths_relabelled() {
        assert_eq!(duration(&[0x02, 0x0F]), "1.5 seconds");
        assert_eq!(duration(&[0x01, 0x05]), "5 seconds");
        assert_eq!(duration(&[0x00, 0x02]), "2 minutes");
        assert_eq!(duration(&[0x01, 0x00]), "Invalid duration: 0100");
        assert_eq!(duration(&[0x07, 0x05]), "Invalid duration: 0705");
    }

    #[test]
    fn test_address_decoding() {
        // 91 = international, ISDN; digits 21 43 -> 1234
        let v = hex::decode("912143").unwrap();
        let text = address(&v);
        assert!(text.contains("TON: International Number"));
        assert!(text.contains("Dialling Number: 1234"));
    }

    #[test]
    fn test_location_info_mccmnc_unswap() {
        // MCCMNC bytes 21 63 54 decode to 123456 (4G framing, 9 bytes)
        let v = hex::decode("216354000100000001").unwrap();
        let text = location_info(&v);
        assert!(text.starts_with("MCCMNC: 123456"), "got {}", text);
        assert!(text.contains("TAC: 0001"));
    }

    #[test]
    fn test_location_info_5g_framing() {
        let v = hex::decode("2163540001020000000001").unwrap();
        let text = location_info(&v);
        assert!(text.contains("TAC: 000102"));
    }

    #[test]
    fn test_event_list() {
        assert_eq!(event_list(&[0x04, 0x07]), "User activity, Language selection");
        assert_eq!(event_list(&[0x1A]), "Unknown Event (1A)");
    }

    #[test]
    fn test_channel_status() {
        let v = hex::decode("8100").unwrap();
        let text = channel_status(&v);
        assert!(text.contains("Channel ID: 1"));
        assert!(text.contains("BIP channel established"));
        assert!(text.contains("No further info can be given"));
    }

    #[test]
    fn test_transport_protocol_port() {
        let v = hex::decode("021F90").unwrap();
        assert_eq!(
            transport_protocol(&v),
            "Transport protocol type: TCP, UICC in client mode, remote connection, port: 8080"
        );
    }

    #[test]
    fn test_dest_address() {
        let v = hex::decode("21C0A80001").unwrap();
        assert_eq!(dest_address(&v), "IPV4: 192.168.0.1");
        let v = hex::decode("5720010DB8").unwrap();
        assert_eq!(dest_address(&v), "IPV6: 2001:0DB8");
        assert_eq!(dest_address(&[0x33]), "Unknown IP type");
    }

    #[test]
    fn test_imei_nibble_swap() {
        let v = hex::decode("1032547698103254").unwrap();
        assert_eq!(imei(&v), "0123456789012345".to_string());
    }

    #[test]
    fn test_timer_fields() {
        assert_eq!(timer_identifier(&[0x03]), "Timer 3");
        assert_eq!(timer_identifier(&[0x0A]), "Reserved");
        assert_eq!(timer_value(&[0x01, 0x30, 0x00]), "01:30:00");
    }
}
