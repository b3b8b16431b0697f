/*!

This is the long-form manual for `election_tally` and `bengaltally`.

## Input formats

The following formats are supported by `bengaltally`:
* `csv` Comma Separated Values (or any other single-byte delimiter)
* `xlsx` Excel workbooks

Both formats expect a header row. Header names are trimmed and lowercased
before being matched, so `Votes ` and `votes` designate the same column.

### `csv`

```text
constituency,year,winner,party,votes,margin,turnout_percentage
Kolkata Uttar,2021,Shashi Panja,AITC,95000,12000,72.4
Kolkata Uttar,2021,Sudipta Roy,BJP,83000,0,72.4
```

The columns `year`, `winner`, `party`, `votes`, `margin` and
`turnout_percentage` are read into election results. The other columns are
ignored, except for the constituency column (`constituency` by default) which
is used to attach results to the configured constituencies.

Values are read leniently: a missing or malformed number is read as `0` and a
missing name as an empty string. A number followed by text (`95000 votes`) keeps
its numeric prefix. Use `--strict` to drop the records whose year is not a
valid election year, which removes most of the defaulted rows.

### `xlsx`

Same layout as `csv`, in the first worksheet of the workbook. If the workbook
has more than one worksheet, its name must be given with
`excelWorksheetName` (or `--excel-worksheet-name`).

## Computations

* vote share: the votes of each party as a percentage of all the votes of the
  selected records. If no votes were cast, no share is reported.
* winning party: the party with the largest vote share. Ties are resolved in
  favour of the smallest party code, in byte order (`CPI` before `CPM`).
* comparison: the vote share of each party in two years. A party absent in one
  year has a share of 0 for that year. No comparison is reported if one of the
  years has no records.
* swing of a constituency: the change of the implied share of the winning
  record, `votes / (votes + margin)`. This is a two-candidate approximation and
  differs from the vote share above.

## Configuration

`bengaltally` accepts a configuration file in JSON. All the entries except
`dataSources` are optional. Relative paths are resolved against the directory
of the configuration file.

```text
{
  "outputSettings": { "title": "Kolkata 2021", "outputPath": "summary.json" },
  "dataSources": [
    { "provider": "csv", "filePath": "results.csv", "delimiter": ";" },
    { "provider": "xlsx", "filePath": "results.xlsx", "excelWorksheetName": "2016",
      "constituencyColumn": "seat" }
  ],
  "constituencies": [
    { "id": "WB-167", "name": "Kolkata Uttar", "district": "Kolkata",
      "assemblySegment": "Kolkata Uttar", "voterCount": 250000 }
  ],
  "parties": [ { "code": "AITC", "name": "All India Trinamool Congress", "color": "#20C997" } ],
  "elections": [ { "year": 2021, "type": "assembly", "date": "2021-05-02" } ],
  "comparison": { "yearA": 2016, "yearB": 2021 }
}
```

The `type` of an election is one of `assembly`, `lok_sabha` or `panchayat`.
The summary lists every configured election with the number of records of its
year.

The command line options `--input`, `--input-type`, `--year-a`, `--year-b` and
`--out` take precedence over the corresponding entries of the configuration.

## Output

The summary is written in JSON. Percentages are written as strings with two
decimals and vote counts as strings, to avoid rounding differences between
tools. Passing `--reference` compares the summary with a previously saved one
and fails if they differ.

 */
