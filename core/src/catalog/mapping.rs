use super::model::{Artifact, ArtifactKind, Emission, Issuer, Picture};
use super::records::{BanknoteRecord, CoinRecord, EmissionRecord, IssuerRecord, PictureRecord};

impl Issuer {
    pub fn from_record(id: impl Into<String>, record: IssuerRecord) -> Self {
        let mut issuer = Issuer::new(id);
        issuer.name = record.name;
        issuer.comments = record.comments;
        issuer
    }
}

impl From<&Issuer> for IssuerRecord {
    fn from(issuer: &Issuer) -> Self {
        IssuerRecord { name: issuer.name.clone(), comments: issuer.comments.clone() }
    }
}

impl Emission {
    pub fn from_record(id: impl Into<String>, record: EmissionRecord) -> Self {
        Emission {
            id: id.into(),
            name: record.name,
            start_year: record.start_year,
            end_year: record.end_year,
            comments: record.comments,
            artifacts: Vec::new(),
        }
    }
}

impl From<PictureRecord> for Picture {
    fn from(record: PictureRecord) -> Self {
        Picture { file_path: record.file_path, description: record.description }
    }
}

impl Artifact {
    pub fn from_coin(id: impl Into<String>, record: CoinRecord) -> Self {
        let fields = record.artifact;
        Artifact {
            id: id.into(),
            display_name: fields.display_name,
            value: fields.value,
            unit: fields.unit,
            substance: fields.substance,
            color: fields.color,
            issue_date: fields.issue_date,
            year: record.mint_year,
            obverse: fields.obverse.map(Picture::from),
            reverse: fields.reverse.map(Picture::from),
            instance_count: instance_count(fields.instance_count),
            kind: ArtifactKind::Coin { diameter: record.diameter, edge: record.edge },
        }
    }

    pub fn from_banknote(id: impl Into<String>, record: BanknoteRecord) -> Self {
        let fields = record.artifact;
        Artifact {
            id: id.into(),
            display_name: fields.display_name,
            value: fields.value,
            unit: fields.unit,
            substance: fields.substance,
            color: fields.color,
            issue_date: fields.issue_date,
            year: record.print_year,
            obverse: fields.obverse.map(Picture::from),
            reverse: fields.reverse.map(Picture::from),
            instance_count: instance_count(fields.instance_count),
            kind: ArtifactKind::Banknote {
                width: record.width,
                height: record.height,
                embossing: record.embossing,
            },
        }
    }
}

/// Missing and negative counts mean no instances.
fn instance_count(count: Option<i32>) -> u32 {
    count.and_then(|n| u32::try_from(n).ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::records::ArtifactFields;

    #[test]
    fn coin_year_comes_from_mint_year() {
        let record = CoinRecord {
            artifact: ArtifactFields { display_name: Some("5 lei".into()), ..ArtifactFields::default() },
            mint_year: Some(1978),
            edge: Some("reeded".into()),
            ..CoinRecord::default()
        };
        let coin = Artifact::from_coin("c", record);

        assert_eq!(coin.year, Some(1978));
        assert_eq!(coin.instance_count, 0);
        assert_eq!(coin.kind, ArtifactKind::Coin { diameter: None, edge: Some("reeded".into()) });
    }

    #[test]
    fn banknote_year_comes_from_print_year() {
        let record = BanknoteRecord {
            artifact: ArtifactFields { instance_count: Some(3), ..ArtifactFields::default() },
            print_year: Some(1966),
            embossing: Some(true),
            ..BanknoteRecord::default()
        };
        let note = Artifact::from_banknote("b", record);

        assert_eq!(note.year, Some(1966));
        assert_eq!(note.instance_count, 3);
        assert!(note.is_banknote());
    }

    #[test]
    fn negative_instance_count_maps_to_zero() {
        let record = CoinRecord {
            artifact: ArtifactFields { instance_count: Some(-4), ..ArtifactFields::default() },
            ..CoinRecord::default()
        };
        assert_eq!(Artifact::from_coin("c", record).instance_count, 0);
    }

    #[test]
    fn issuer_record_round_trip_keeps_scalar_fields() {
        let record = IssuerRecord { name: Some("Romania".into()), comments: Some("complete".into()) };
        let issuer = Issuer::from_record("x/m-issuer.json", record.clone());
        assert_eq!(IssuerRecord::from(&issuer), record);
        assert_eq!(issuer.id(), "x/m-issuer.json");
    }
}
