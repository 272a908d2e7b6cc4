//! Samples from the sample metadata sheet.
//!
//! Cells are addressed by sub-header label, so column order may change
//! between releases. A missing label reads as an empty cell.

use std::collections::BTreeMap;

use pofatu_ingest::{SheetHeader, SheetName, SheetRow};
use pofatu_model::{
    ANALYZED_MATERIAL_1, ANALYZED_MATERIAL_2, ARTEFACT_ATTRIBUTES, ARTEFACT_CATEGORY,
    ARTEFACT_COLLECTION_TYPE, Artefact, Location, ModelError, SITE_CONTEXT, Sample,
    SampleCategory, Site,
};
use pofatu_standards::Errata;
use tracing::{debug, warn};

use crate::error::{BuildError, Result};
use crate::fields::{Fields, is_placeholder};
use crate::options::BuildOptions;

const SAMPLE_ID: &str = "Sample ID";
const SAMPLE_NAME: &str = "Sample name";
const SAMPLE_CATEGORY: &str = "Sample category";
const SAMPLE_COMMENT: &str = "Sample comment";
const PETROGRAPHY: &str = "Petrography";
const SAMPLE_CITATION: &str = "Citation code 1";
const ANALYZED_MATERIAL_1_LABEL: &str = "Analyzed material 1";
const ANALYZED_MATERIAL_2_LABEL: &str = "Analyzed material 2";
const LOCATION_1: &str = "Location 1";
const LOCATION_2: &str = "Location 2";
const LOCATION_3: &str = "Location 3";
const LOCATION_COMMENT: &str = "Location comment";
const LATITUDE: &str = "Latitude";
const LONGITUDE: &str = "Longitude";
const ELEVATION: &str = "Elevation";
const ARTEFACT_ID: &str = "Artefact ID";
const ARTEFACT_NAME: &str = "Artefact name";
const ARTEFACT_CATEGORY_LABEL: &str = "Artefact category";
const ARTEFACT_ATTRIBUTES_LABEL: &str = "Artefact attributes";
const ARTEFACT_COMMENTS: &str = "Artefact comments";
const ARTEFACT_CITATION: &str = "Citation code 2";
const COLLECTION_TYPE: &str = "Fieldwork/collection type";
const COLLECTOR: &str = "Collector";
const COLLECTION_COMMENT: &str = "Collection comment";
const SITE_NAME: &str = "Site name";
const SITE_CODE: &str = "Site code";
const SITE_CONTEXT_LABEL: &str = "Site context";
const SITE_COMMENTS: &str = "Site comments";
const STRATIGRAPHIC_POSITION: &str = "Stratigraphic position";
const STRATIGRAPHY_COMMENT: &str = "Stratigraphy comment";
const SITE_CITATION: &str = "Citation code 3";

/// Builds samples in sheet order, enforcing unique ids.
#[derive(Debug)]
pub(crate) struct SampleCollector<'a> {
    errata: &'a Errata,
    options: BuildOptions,
    samples: Vec<Sample>,
    /// Sample id to the first row seen for it.
    seen: BTreeMap<String, SheetRow>,
}

impl<'a> SampleCollector<'a> {
    pub(crate) fn new(errata: &'a Errata, options: BuildOptions) -> Self {
        Self {
            errata,
            options,
            samples: Vec::new(),
            seen: BTreeMap::new(),
        }
    }

    /// Rejects a header without a sample id column. Other absent labels read
    /// as empty cells, so they are only logged.
    pub(crate) fn check_header(header: &SheetHeader) -> Result<()> {
        if header.position(SAMPLE_ID).is_none() {
            return Err(BuildError::MissingColumn {
                sheet: SheetName::SampleMetadata,
                column: SAMPLE_ID,
            });
        }
        for label in [SAMPLE_NAME, SAMPLE_CATEGORY] {
            if header.position(label).is_none() {
                warn!(column = label, "sample metadata column missing");
            }
        }
        Ok(())
    }

    pub(crate) fn add_row(&mut self, row: SheetRow) -> Result<()> {
        let raw_id = row.by_label(SAMPLE_ID);
        if is_placeholder(raw_id) {
            debug!(row = row.index, id = raw_id.unwrap_or_default(), "placeholder sample id skipped");
            return Ok(());
        }
        let id = self.errata.sample_id(raw_id.unwrap_or_default());

        if let Some(first) = self.seen.get(&id) {
            if first.cells == row.cells {
                debug!(sample = %id, row = row.index, "identical duplicate sample row ignored");
                return Ok(());
            }
            return Err(BuildError::ConflictingSample {
                id,
                first: first.index,
                second: row.index,
            });
        }

        let sample = build_sample(id.clone(), &Fields::new(&row, self.errata, self.options))?;
        self.samples.push(sample);
        self.seen.insert(id, row);
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<Sample> {
        self.samples
    }
}

fn build_sample(id: String, fields: &Fields<'_>) -> Result<Sample> {
    let source_id = fields.citation_key(SAMPLE_CITATION);
    let category =
        SampleCategory::parse(fields.raw(SAMPLE_CATEGORY), fields.errata().vocabulary_typos())
            .map_err(|e| fields.invalid(SAMPLE_CATEGORY, e))?;

    Ok(Sample {
        name: fields
            .raw(SAMPLE_NAME)
            .map(|name| fields.errata().sample_name(name, source_id.as_deref())),
        category,
        comment: fields.text(SAMPLE_COMMENT),
        petrography: fields.text(PETROGRAPHY),
        analyzed_material_1: fields.term(&ANALYZED_MATERIAL_1, ANALYZED_MATERIAL_1_LABEL)?,
        analyzed_material_2: fields.term(&ANALYZED_MATERIAL_2, ANALYZED_MATERIAL_2_LABEL)?,
        location: build_location(fields)?,
        artefact: build_artefact(fields)?,
        site: build_site(fields)?,
        source_id,
        id,
    })
}

fn build_location(fields: &Fields<'_>) -> Result<Location> {
    let location = Location {
        loc1: fields.text(LOCATION_1),
        loc2: fields.text(LOCATION_2),
        loc3: fields.text(LOCATION_3),
        comment: fields.text(LOCATION_COMMENT),
        latitude: fields.float(LATITUDE)?,
        longitude: fields.float(LONGITUDE)?,
        elevation: fields.text(ELEVATION),
    };
    location.validated().map_err(|e| {
        let column = match &e {
            ModelError::CoordinateOutOfRange {
                axis: "latitude", ..
            } => LATITUDE,
            _ => LONGITUDE,
        };
        fields.invalid(column, e)
    })
}

fn build_artefact(fields: &Fields<'_>) -> Result<Artefact> {
    Ok(Artefact {
        id: fields.text(ARTEFACT_ID),
        name: fields.text(ARTEFACT_NAME),
        category: fields.term(&ARTEFACT_CATEGORY, ARTEFACT_CATEGORY_LABEL)?,
        attributes: fields.term(&ARTEFACT_ATTRIBUTES, ARTEFACT_ATTRIBUTES_LABEL)?,
        comment: fields.text(ARTEFACT_COMMENTS),
        source_ids: fields.citation_keys(ARTEFACT_CITATION),
        collection_type: fields.term(&ARTEFACT_COLLECTION_TYPE, COLLECTION_TYPE)?,
        collector: fields.text(COLLECTOR),
        collection_comment: fields.text(COLLECTION_COMMENT),
    })
}

fn build_site(fields: &Fields<'_>) -> Result<Site> {
    Ok(Site {
        name: fields.text(SITE_NAME),
        code: fields.text(SITE_CODE),
        context: fields.term(&SITE_CONTEXT, SITE_CONTEXT_LABEL)?,
        comment: fields.text(SITE_COMMENTS),
        stratigraphic_position: fields.text(STRATIGRAPHIC_POSITION),
        stratigraphy_comment: fields.text(STRATIGRAPHY_COMMENT),
        source_ids: fields.citation_keys(SITE_CITATION),
    })
}
