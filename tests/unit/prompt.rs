use smartfix_relay::hours::BusinessHours;
use smartfix_relay::prompt::{
    is_fallback, system_prompt, Persona, CLOSED_CLOSING, FALLBACK_MARKER, OPEN_CLOSING,
};

#[test]
fn test_default_persona() {
    let persona = Persona::default();
    assert_eq!(persona.business_name, "Smartfix Repair");
    assert_eq!(persona.address, "Jalan Majapahit No. 83, Kuta, Badung, Bali");
    assert_eq!(persona.maps_url, "https://maps.app.goo.gl/E6nHaKsVpRnP9Vd39");
    assert_eq!(persona.signature, "**- Smartfix AI Customer Service**");
}

#[test]
fn test_system_prompt_contents() {
    let prompt = system_prompt(&Persona::default(), &BusinessHours::default(), true);
    assert!(prompt.starts_with("You are a helpful AI bot for Smartfix Repair"));
    assert!(prompt.contains("Jalan Majapahit No. 83, Kuta, Badung, Bali"));
    assert!(prompt.contains("https://maps.app.goo.gl/E6nHaKsVpRnP9Vd39"));
    assert!(prompt.contains("business hours (9 AM – 8 PM, daily except Sunday)"));
    assert!(prompt.contains(OPEN_CLOSING));
    assert!(prompt.contains(CLOSED_CLOSING));
    assert!(prompt.contains("Always reply in the user's language."));
    assert!(prompt.contains("Add \"**- Smartfix AI Customer Service**\" at the end of each reply."));
    assert!(!prompt.contains("  "), "no stray indentation: {prompt}");
}

#[test]
fn test_custom_persona_is_used() {
    let persona = Persona {
        business_name: "Fixit".to_string(),
        address: "Main St 1".to_string(),
        ..Persona::default()
    };
    let prompt = system_prompt(&persona, &BusinessHours::default(), false);
    assert!(prompt.contains("AI bot for Fixit"));
    assert!(prompt.contains("located at Main St 1."));
    assert!(prompt.contains("currently closed"));
}

#[test]
fn test_fallback_detection() {
    assert!(is_fallback(
        "Terima kasih. Our team will follow up with you once we reopen. **- Smartfix AI Customer Service**"
    ));
    assert!(is_fallback(&format!("... {FALLBACK_MARKER} soon")));
    assert!(!is_fallback(
        "We are at Jalan Majapahit No. 83, Kuta. **- Smartfix AI Customer Service**"
    ));
    assert!(!is_fallback(""));
}
