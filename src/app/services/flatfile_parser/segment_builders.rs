//! Typed segment construction from decoded field values

use super::segment_decoder::DecodedFields;
use crate::app::models::{
    AdministrativeSegment, ArresteeSegment, DrugItem, GroupBArrestSegment, LeokaDetails,
    OffenderRelation, OffenderSegment, OffenseSegment, PropertyItem,
    PropertySegment, Segment, SegmentHeader, SegmentLevel, SegmentSource, SubmissionInfo,
    VictimSegment, WeaponForce, ZeroReportSegment,
};
use crate::constants::lengths;

/// Build the typed segment for a level.
///
/// `fields` is empty when the line failed its length check; the segment is
/// still built with every field missing.
pub fn build_segment(
    level: SegmentLevel,
    header: SegmentHeader,
    source: SegmentSource,
    fields: &DecodedFields,
) -> Segment {
    match level {
        SegmentLevel::ZeroReport => Segment::ZeroReport(ZeroReportSegment {
            source,
            header,
            submission: submission(fields),
            zero_report_month: fields.integer("zero_report_month"),
            zero_report_year: fields.integer("zero_report_year"),
        }),
        SegmentLevel::Administrative => {
            Segment::Administrative(administrative(header, source, fields))
        }
        SegmentLevel::Offense => Segment::Offense(offense(header, source, fields)),
        SegmentLevel::Property => Segment::Property(property(header, source, fields)),
        SegmentLevel::Victim => Segment::Victim(victim(header, source, fields)),
        SegmentLevel::Offender => Segment::Offender(OffenderSegment {
            source,
            header,
            offender_sequence_number: fields.integer("offender_sequence_number"),
            age: fields.age("age"),
            sex: fields.text("sex"),
            race: fields.text("race"),
            ethnicity: fields.text("ethnicity"),
        }),
        SegmentLevel::Arrestee => Segment::Arrestee(arrestee(header, source, fields)),
        SegmentLevel::GroupBArrest => Segment::GroupBArrest(GroupBArrestSegment {
            submission: submission(fields),
            federal_judicial_district_code: fields.text("federal_judicial_district_code"),
            arrestee: arrestee(header, source, fields),
        }),
    }
}

fn submission(fields: &DecodedFields) -> SubmissionInfo {
    SubmissionInfo {
        month_of_submission: fields.integer("month_of_submission"),
        year_of_submission: fields.integer("year_of_submission"),
        city_indicator: fields.text("city_indicator"),
    }
}

fn administrative(
    header: SegmentHeader,
    source: SegmentSource,
    fields: &DecodedFields,
) -> AdministrativeSegment {
    AdministrativeSegment {
        source,
        header,
        submission: submission(fields),
        incident_date: fields.date("incident_date"),
        report_date_indicator: fields.text("report_date_indicator"),
        incident_hour: fields.integer("incident_hour"),
        exceptional_clearance_code: fields.text("exceptional_clearance_code"),
        exceptional_clearance_date: fields.date("exceptional_clearance_date"),
        cargo_theft_indicator: fields.text("cargo_theft_indicator"),
        federal_judicial_district_code: fields.text("federal_judicial_district_code"),
    }
}

/// Pair each weapon code with the automatic indicator in the same slot
fn weapons(fields: &DecodedFields, codes: &str, indicators: &str) -> Vec<WeaponForce> {
    let indicators = fields.codes(indicators);
    fields
        .codes(codes)
        .into_iter()
        .enumerate()
        .filter_map(|(slot, code)| {
            code.map(|code| WeaponForce {
                code,
                automatic_indicator: indicators.get(slot).cloned().flatten(),
            })
        })
        .collect()
}

fn offense(header: SegmentHeader, source: SegmentSource, fields: &DecodedFields) -> OffenseSegment {
    OffenseSegment {
        source,
        header,
        ucr_offense_code: fields.text("ucr_offense_code"),
        offense_attempted_completed: fields.text("offense_attempted_completed"),
        offenders_suspected_of_using: fields.present_codes("offenders_suspected_of_using"),
        location_type: fields.text("location_type"),
        number_of_premises_entered: fields.integer("number_of_premises_entered"),
        method_of_entry: fields.text("method_of_entry"),
        type_of_criminal_activity: fields.present_codes("type_of_criminal_activity"),
        type_of_weapon_force_involved: weapons(
            fields,
            "type_of_weapon_force_involved",
            "automatic_weapon_indicator",
        ),
        bias_motivation: fields.present_codes("bias_motivation"),
    }
}

fn property(
    header: SegmentHeader,
    source: SegmentSource,
    fields: &DecodedFields,
) -> PropertySegment {
    let descriptions = fields.codes("property_description");
    let values = fields.amounts("value_of_property");
    let dates = fields.dates("date_recovered");

    let items = (0..descriptions.len().max(values.len()).max(dates.len()))
        .map(|slot| PropertyItem {
            description: descriptions.get(slot).cloned().flatten(),
            value: values.get(slot).cloned().unwrap_or_default(),
            date_recovered: dates.get(slot).cloned().unwrap_or_default(),
        })
        .filter(|item| {
            item.description.is_some()
                || !item.value.is_missing()
                || !item.date_recovered.is_missing()
        })
        .collect();

    let drug_types = fields.codes("suspected_drug_type");
    let quantities = fields.quantities("estimated_drug_quantity");
    let measurements = fields.codes("type_drug_measurement");

    let drugs = (0..drug_types.len().max(quantities.len()).max(measurements.len()))
        .map(|slot| DrugItem {
            drug_type: drug_types.get(slot).cloned().flatten(),
            estimated_quantity: quantities.get(slot).cloned().unwrap_or_default(),
            measurement: measurements.get(slot).cloned().flatten(),
        })
        .filter(|drug| {
            drug.drug_type.is_some()
                || !drug.estimated_quantity.is_missing()
                || drug.measurement.is_some()
        })
        .collect();

    PropertySegment {
        source,
        header,
        type_of_property_loss: fields.text("type_of_property_loss"),
        items,
        number_of_stolen_motor_vehicles: fields.integer("number_of_stolen_motor_vehicles"),
        number_of_recovered_motor_vehicles: fields.integer("number_of_recovered_motor_vehicles"),
        drugs,
    }
}

fn victim(header: SegmentHeader, source: SegmentSource, fields: &DecodedFields) -> VictimSegment {
    let offender_numbers = fields.integers("offender_number_related");
    let relationships = fields.codes("victim_offender_relationship");

    let offender_relations = offender_numbers
        .into_iter()
        .zip(relationships)
        .filter(|(number, relationship)| !number.is_missing() || relationship.is_some())
        .map(|(offender_number, relationship)| OffenderRelation {
            offender_number,
            relationship,
        })
        .collect();

    let leoka = (source.observed_length == lengths::VICTIM_WITH_LEOKA
        && fields.is_present("officer_other_jurisdiction_ori"))
    .then(|| LeokaDetails {
        type_of_officer_activity_circumstance: fields
            .text("type_of_officer_activity_circumstance"),
        officer_assignment_type: fields.text("officer_assignment_type"),
        officer_other_jurisdiction_ori: fields.text("officer_other_jurisdiction_ori"),
    });

    VictimSegment {
        source,
        header,
        victim_sequence_number: fields.integer("victim_sequence_number"),
        ucr_offense_code_connections: fields.present_codes("ucr_offense_code_connection"),
        type_of_victim: fields.text("type_of_victim"),
        age: fields.age("age"),
        sex: fields.text("sex"),
        race: fields.text("race"),
        ethnicity: fields.text("ethnicity"),
        resident_status: fields.text("resident_status"),
        aggravated_assault_homicide_circumstances: fields
            .present_codes("aggravated_assault_homicide_circumstances"),
        additional_justifiable_homicide_circumstances: fields
            .text("additional_justifiable_homicide_circumstances"),
        type_of_injury: fields.present_codes("type_of_injury"),
        offender_relations,
        leoka,
    }
}

fn arrestee(
    header: SegmentHeader,
    source: SegmentSource,
    fields: &DecodedFields,
) -> ArresteeSegment {
    ArresteeSegment {
        source,
        header,
        arrestee_sequence_number: fields.integer("arrestee_sequence_number"),
        arrest_transaction_number: fields.text("arrest_transaction_number"),
        arrest_date: fields.date("arrest_date"),
        type_of_arrest: fields.text("type_of_arrest"),
        multiple_arrestee_segments_indicator: fields
            .text("multiple_arrestee_segments_indicator"),
        ucr_arrest_offense_code: fields.text("ucr_arrest_offense_code"),
        armed_with: weapons(fields, "arrestee_armed_with", "automatic_weapon_indicator"),
        age: fields.age("age"),
        sex: fields.text("sex"),
        race: fields.text("race"),
        ethnicity: fields.text("ethnicity"),
        resident_status: fields.text("resident_status"),
        disposition_of_arrestee_under_18: fields.text("disposition_of_arrestee_under_18"),
    }
}
