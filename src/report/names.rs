use crate::domain::{Name, NameFormat};

/// Renders a name in the chosen format. Empty parts are left out.
pub(crate) fn display_name(name: &Name, format: NameFormat) -> String {
    let given = join([name.first.as_str(), name.suffix.as_str()]);

    match format {
        NameFormat::GivenSurname => {
            join([name.first.as_str(), name.surname.as_str(), name.suffix.as_str()])
        }
        NameFormat::SurnameGiven => surname_first(&name.surname, &given),
        NameFormat::UpperSurnameGiven => surname_first(&name.surname.to_uppercase(), &given),
        NameFormat::Given => name.first.clone(),
    }
}

/// The alphabetical-index key for a name: `SURNAME, First Suffix`.
pub(crate) fn index_key(name: &Name) -> String {
    let given = join([name.first.as_str(), name.suffix.as_str()]);
    format!("{}, {given}", name.surname.to_uppercase())
}

fn surname_first(surname: &str, given: &str) -> String {
    match (surname.is_empty(), given.is_empty()) {
        (false, false) => format!("{surname}, {given}"),
        (false, true) => surname.to_string(),
        (true, _) => given.to_string(),
    }
}

fn join<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(NameFormat::GivenSurname, "John Smith Jr")]
    #[test_case(NameFormat::SurnameGiven, "Smith, John Jr")]
    #[test_case(NameFormat::UpperSurnameGiven, "SMITH, John Jr")]
    #[test_case(NameFormat::Given, "John")]
    fn formats(format: NameFormat, expected: &str) {
        let name = Name::new("John", "Smith").with_suffix("Jr");
        assert_eq!(display_name(&name, format), expected);
    }

    #[test]
    fn missing_parts_are_skipped() {
        assert_eq!(display_name(&Name::new("", "Smith"), NameFormat::SurnameGiven), "Smith");
        assert_eq!(display_name(&Name::new("Ann", ""), NameFormat::GivenSurname), "Ann");
        assert_eq!(display_name(&Name::default(), NameFormat::GivenSurname), "");
    }

    #[test]
    fn index_keys() {
        assert_eq!(index_key(&Name::new("John", "Smith")), "SMITH, John");
        assert_eq!(
            index_key(&Name::new("John", "Smith").with_suffix("Jr")),
            "SMITH, John Jr"
        );
    }
}
